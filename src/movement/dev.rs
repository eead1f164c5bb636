//! Movement domain: sandbox room and debug presentation for play-testing.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{LocomotionState, LocomotionTuning, Player, Posture, VerticalMode};
use crate::sensing::draw_sensor_probes;
use crate::sensing::layers::player_layers;
use crate::sensing::{
    CharacterBody, EnvironmentContact, EnvironmentSensor, GameLayer, GroundEffector,
    PendingDisplacement, SensorTuning,
};

const PLAYER_SIZE: Vec2 = Vec2::new(1.0, 2.0);
const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, -4.0, 0.0);

pub struct SandboxPlugin;

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, spawn_test_room, spawn_player))
            .add_systems(Update, (present_pose, draw_sensor_probes));
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0 / 28.0,
            ..OrthographicProjection::default_2d()
        }),
    ));
}

pub(crate) fn spawn_player(
    mut commands: Commands,
    tuning: Res<LocomotionTuning>,
    sensor_tuning: Res<SensorTuning>,
) {
    let body = match CharacterBody::new(PLAYER_SIZE) {
        Ok(body) => body,
        Err(e) => {
            error!("Cannot spawn player: {}", e);
            return;
        }
    };

    info!(
        "Spawning player: size={}, jump_height={:.2}, power_jump_height={:.2}",
        body.size(),
        tuning.single_jump_height(),
        tuning.power_jump_height()
    );

    commands.spawn((
        // Identity & Locomotion
        (
            Player,
            body,
            EnvironmentSensor::new(sensor_tuning.clone()),
            EnvironmentContact::default(),
            PendingDisplacement::default(),
            LocomotionState::new(&tuning),
        ),
        // Rendering
        Sprite {
            color: Color::srgb(0.9, 0.9, 0.9),
            custom_size: Some(body.size()),
            ..default()
        },
        Transform::from_translation(PLAYER_SPAWN),
        // Physics
        (RigidBody::Kinematic, body.collider(), player_layers()),
    ));
}

pub(crate) fn spawn_test_room(mut commands: Commands) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let platform_color = Color::srgb(0.5, 0.4, 0.3);

    let ground_layers = CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]);
    let wall_layers = CollisionLayers::new(GameLayer::Wall, [GameLayer::Player]);
    let platform_layers = CollisionLayers::new(GameLayer::Platform, [GameLayer::Player]);

    let solid = |size: Vec2, color: Color, transform: Transform, layers: CollisionLayers| {
        (
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            transform,
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            layers,
        )
    };

    // Ground
    commands.spawn(solid(
        Vec2::new(40.0, 1.0),
        ground_color,
        Transform::from_xyz(0.0, -8.0, 0.0),
        ground_layers,
    ));

    // Left and right walls
    for x in [-20.5, 20.5] {
        commands.spawn(solid(
            Vec2::new(1.0, 24.0),
            wall_color,
            Transform::from_xyz(x, 3.5, 0.0),
            wall_layers,
        ));
    }

    // Walkable slope (30 degrees) and a slide-off slope (60 degrees)
    commands.spawn(solid(
        Vec2::new(8.0, 0.5),
        ground_color,
        Transform::from_xyz(10.0, -6.0, 0.0).with_rotation(Quat::from_rotation_z(30f32.to_radians())),
        ground_layers,
    ));
    commands.spawn(solid(
        Vec2::new(6.0, 0.5),
        ground_color,
        Transform::from_xyz(-15.0, -5.0, 0.0).with_rotation(Quat::from_rotation_z(-60f32.to_radians())),
        ground_layers,
    ));

    // Crawl space: ceiling low enough that standing up is blocked
    commands.spawn(solid(
        Vec2::new(6.0, 1.0),
        wall_color,
        Transform::from_xyz(-6.0, -5.5, 0.0),
        wall_layers,
    ));

    // One-way platforms
    for (x, y) in [(-4.0, 0.0), (4.0, 4.0)] {
        commands.spawn((
            solid(
                Vec2::new(5.0, 0.4),
                platform_color,
                Transform::from_xyz(x, y, 0.0),
                platform_layers,
            ),
            GroundEffector::one_way_platform(),
        ));
    }

    // Pillar for wall jumping and wall running practice
    commands.spawn(solid(
        Vec2::new(1.0, 10.0),
        wall_color,
        Transform::from_xyz(15.0, 4.0, 0.0),
        wall_layers,
    ));
}

/// Map the locomotion pose onto the sandbox sprite.
fn present_pose(mut query: Query<(&LocomotionState, &CharacterBody, &mut Sprite), With<Player>>) {
    for (state, body, mut sprite) in &mut query {
        sprite.flip_x = !state.facing_right();
        sprite.custom_size = Some(body.size());

        sprite.color = match (state.vertical_mode, state.posture) {
            (VerticalMode::Dashing, _) => Color::srgb(0.4, 0.8, 1.0),
            (VerticalMode::Gliding, _) => Color::srgb(0.7, 1.0, 0.7),
            (VerticalMode::GroundSlamming, _) => Color::srgb(1.0, 0.4, 0.3),
            (VerticalMode::WallSliding, _) => Color::srgb(0.9, 0.8, 0.5),
            (VerticalMode::Normal, Posture::Creeping) => Color::srgb(0.6, 0.6, 0.7),
            (VerticalMode::Normal, Posture::Crouching) => Color::srgb(0.75, 0.75, 0.8),
            (VerticalMode::Normal, Posture::Standing) => Color::srgb(0.9, 0.9, 0.9),
        };
    }
}

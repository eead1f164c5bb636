//! Sensing domain: tests for contact classification, edge flags and sweeps.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::layers::player_layers;
use super::{
    CastHeadroom, CharacterBody, EnvironmentContact, EnvironmentSensor, GameLayer, GroundEffector,
    GroundEffectorQuery, GroundType, HeadroomProbe, PendingDisplacement, PreviousContact, ProbeShape,
    SensingPlugin, SensorTuning, SetupError, ShapeCaster, SurfaceHit, WallSide, signed_slope_angle,
};

const BODY_SIZE: Vec2 = Vec2::new(1.0, 2.0);

// -----------------------------------------------------------------------------
// Synthetic world
// -----------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Side {
    /// Surface facing up at height `at`
    Floor,
    /// Surface facing down at height `at`
    Ceiling,
    /// Surface facing right at x = `at`
    LeftWall,
    /// Surface facing left at x = `at`
    RightWall,
}

#[derive(Clone, Copy)]
struct Surface {
    side: Side,
    at: f32,
    normal: Vec2,
    layer: GameLayer,
    entity: Entity,
}

/// Infinite axis-aligned planes; records every cast made against it.
#[derive(Default)]
struct TestWorld {
    surfaces: Vec<Surface>,
    casts: RefCell<Vec<(ProbeShape, Dir2, f32)>>,
}

impl TestWorld {
    fn with(mut self, side: Side, at: f32, entity: Entity) -> Self {
        let (normal, layer) = match side {
            Side::Floor => (Vec2::Y, GameLayer::Ground),
            Side::Ceiling => (Vec2::NEG_Y, GameLayer::Ground),
            Side::LeftWall => (Vec2::X, GameLayer::Wall),
            Side::RightWall => (Vec2::NEG_X, GameLayer::Wall),
        };
        self.surfaces.push(Surface {
            side,
            at,
            normal,
            layer,
            entity,
        });
        self
    }

    /// Floor whose reported normal is tilted by `degrees` (positive descends to the right).
    fn with_sloped_floor(mut self, at: f32, degrees: f32, entity: Entity) -> Self {
        let radians = degrees.to_radians();
        self.surfaces.push(Surface {
            side: Side::Floor,
            at,
            normal: Vec2::new(radians.sin(), radians.cos()),
            layer: GameLayer::Ground,
            entity,
        });
        self
    }

    fn with_platform(mut self, at: f32, entity: Entity) -> Self {
        self.surfaces.push(Surface {
            side: Side::Floor,
            at,
            normal: Vec2::Y,
            layer: GameLayer::Platform,
            entity,
        });
        self
    }
}

impl ShapeCaster for TestWorld {
    fn cast(
        &self,
        shape: ProbeShape,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        self.casts.borrow_mut().push((shape, direction, max_distance));

        let half = shape.half_extents();
        let dir = direction.as_vec2();

        self.surfaces
            .iter()
            .filter(|s| mask.0 & s.layer.to_bits() != 0)
            .filter_map(|s| {
                let (gap, speed) = match s.side {
                    Side::Floor => ((origin.y - half.y) - s.at, -dir.y),
                    Side::Ceiling => (s.at - (origin.y + half.y), dir.y),
                    Side::LeftWall => ((origin.x - half.x) - s.at, -dir.x),
                    Side::RightWall => (s.at - (origin.x + half.x), dir.x),
                };
                if speed <= 0.0 || gap < 0.0 {
                    return None;
                }
                let distance = gap / speed;
                (distance <= max_distance).then(|| SurfaceHit {
                    point: origin + dir * distance,
                    normal: s.normal,
                    distance,
                    surface: s.entity,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[derive(Default)]
struct Effectors(HashMap<Entity, GroundType>);

impl GroundEffectorQuery for Effectors {
    fn ground_type(&self, surface: Entity) -> Option<GroundType> {
        self.0.get(&surface).copied()
    }
}

fn entities(count: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..count).map(|_| world.spawn_empty().id()).collect()
}

fn body() -> CharacterBody {
    CharacterBody::new(BODY_SIZE).unwrap()
}

/// Character centered at the origin, so its feet are at y = -1.
fn sense(sensor: &mut EnvironmentSensor, world: &TestWorld, now: f64) -> EnvironmentContact {
    let mut position = Vec2::ZERO;
    sensor.advance(&mut position, &body(), Vec2::ZERO, now, world, &Effectors::default())
}

// -----------------------------------------------------------------------------
// Slope classification tests
// -----------------------------------------------------------------------------

#[test]
fn test_signed_slope_angle_convention() {
    assert!(signed_slope_angle(Vec2::Y).abs() < 1e-4);

    let descends_right = Vec2::new(30f32.to_radians().sin(), 30f32.to_radians().cos());
    assert!((signed_slope_angle(descends_right) - 30.0).abs() < 1e-3);
    assert!((signed_slope_angle(Vec2::new(-descends_right.x, descends_right.y)) + 30.0).abs() < 1e-3);
}

#[test]
fn test_steep_slopes_are_never_ground() {
    let tuning = SensorTuning::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let ground = entities(1)[0];

    for _ in 0..200 {
        let magnitude = rng.random_range(tuning.slope_angle_limit + 0.01..89.9);
        let angle = if rng.random_bool(0.5) { magnitude } else { -magnitude };

        let world = TestWorld::default().with_sloped_floor(-1.1, angle, ground);
        let mut sensor = EnvironmentSensor::new(tuning.clone());
        let contact = sense(&mut sensor, &world, 0.0);

        assert!(!contact.below, "slope {} should not be ground", angle);
        assert!((contact.slope_angle - angle).abs() < 0.01);
    }
}

#[test]
fn test_walkable_slopes_are_ground() {
    let ground = entities(1)[0];

    for angle in [-44.0, -30.0, 0.0, 12.5, 44.0] {
        let world = TestWorld::default().with_sloped_floor(-1.1, angle, ground);
        let mut sensor = EnvironmentSensor::default();
        let contact = sense(&mut sensor, &world, 0.0);

        assert!(contact.below, "slope {} should be ground", angle);
        assert_eq!(contact.ground_type, GroundType::LevelGeometry);
    }
}

// -----------------------------------------------------------------------------
// Ground type tests
// -----------------------------------------------------------------------------

#[test]
fn test_no_ground_hit_classifies_as_none() {
    let mut sensor = EnvironmentSensor::default();
    let contact = sense(&mut sensor, &TestWorld::default(), 0.0);

    assert!(!contact.below);
    assert_eq!(contact.ground_type, GroundType::None);
}

#[test]
fn test_ground_effector_overrides_classification() {
    let platform = entities(1)[0];
    let world = TestWorld::default().with_platform(-1.1, platform);
    let mut effectors = Effectors::default();
    effectors.0.insert(platform, GroundType::OneWayPlatform);

    let mut sensor = EnvironmentSensor::default();
    let mut position = Vec2::ZERO;
    let contact = sensor.advance(&mut position, &body(), Vec2::ZERO, 0.0, &world, &effectors);

    assert!(contact.below);
    assert_eq!(contact.ground_type, GroundType::OneWayPlatform);
}

#[test]
fn test_ground_beyond_probe_distance_is_not_detected() {
    let world = TestWorld::default().with(Side::Floor, -1.5, entities(1)[0]);
    let mut sensor = EnvironmentSensor::default();

    assert!(!sense(&mut sensor, &world, 0.0).below);
}

// -----------------------------------------------------------------------------
// Edge flag tests
// -----------------------------------------------------------------------------

#[test]
fn test_hit_ground_only_on_transition() {
    let ground = entities(1)[0];
    let air = TestWorld::default();
    let floor = TestWorld::default().with(Side::Floor, -1.1, ground);
    let mut sensor = EnvironmentSensor::default();

    assert!(!sense(&mut sensor, &air, 0.0).hit_ground_this_frame);

    let landed = sense(&mut sensor, &floor, 0.1);
    assert!(landed.below);
    assert!(landed.hit_ground_this_frame);

    for tick in 2..6 {
        let contact = sense(&mut sensor, &floor, tick as f64 * 0.1);
        assert!(contact.below);
        assert!(!contact.hit_ground_this_frame);
    }

    assert!(!sense(&mut sensor, &air, 1.0).hit_ground_this_frame);
    assert!(sense(&mut sensor, &floor, 1.1).hit_ground_this_frame);
}

#[test]
fn test_hit_wall_only_when_no_side_touched_before() {
    let ids = entities(2);
    let left = TestWorld::default().with(Side::LeftWall, -0.6, ids[0]);
    let both = TestWorld::default()
        .with(Side::LeftWall, -0.6, ids[0])
        .with(Side::RightWall, 0.6, ids[1]);
    let mut sensor = EnvironmentSensor::default();

    let first = sense(&mut sensor, &left, 0.0);
    assert!(first.left && !first.right);
    assert!(first.hit_wall_this_frame);
    assert_eq!(first.wall_side(), WallSide::Left);

    // Gaining the second side is not a new wall hit
    let second = sense(&mut sensor, &both, 0.1);
    assert!(second.left && second.right);
    assert!(!second.hit_wall_this_frame);
}

#[test]
fn test_previous_contact_edges() {
    let airborne = PreviousContact::default();
    assert!(airborne.landed(true));
    assert!(!airborne.landed(false));
    assert!(airborne.hit_wall(false, true));

    let grounded_on_wall = PreviousContact {
        below: true,
        left: true,
        right: false,
    };
    assert!(!grounded_on_wall.landed(true));
    assert!(!grounded_on_wall.hit_wall(true, false));
}

// -----------------------------------------------------------------------------
// Lateral and overhead probe tests
// -----------------------------------------------------------------------------

#[test]
fn test_lateral_probes_use_shrunk_box_and_double_distance() {
    let world = TestWorld::default();
    let mut sensor = EnvironmentSensor::default();
    sense(&mut sensor, &world, 0.0);

    let casts = world.casts.borrow();
    let lateral: Vec<_> = casts
        .iter()
        .filter(|(shape, _, _)| matches!(shape, ProbeShape::Box(_)))
        .collect();

    assert_eq!(lateral.len(), 2);
    for (shape, direction, distance) in lateral {
        assert!((shape.size() - BODY_SIZE * 0.6).length() < 1e-5);
        assert!((distance - 0.4).abs() < 1e-5);
        assert!(direction.y.abs() < 1e-5);
    }
}

#[test]
fn test_wall_beyond_lateral_reach_is_not_contact() {
    // Box half width is 0.3, reach is 0.4: anything past x = 0.7 is out of range
    let world = TestWorld::default().with(Side::RightWall, 0.75, entities(1)[0]);
    let mut sensor = EnvironmentSensor::default();

    let contact = sense(&mut sensor, &world, 0.0);
    assert!(!contact.right);
    assert!(!contact.wall_contact());
}

#[test]
fn test_ceiling_within_probe_sets_above() {
    let world = TestWorld::default().with(Side::Ceiling, 1.15, entities(1)[0]);
    let mut sensor = EnvironmentSensor::default();

    assert!(sense(&mut sensor, &world, 0.0).above);
}

// -----------------------------------------------------------------------------
// Ground check suspension tests
// -----------------------------------------------------------------------------

#[test]
fn test_suspended_ground_check_forces_airborne_until_deadline() {
    let floor = TestWorld::default().with(Side::Floor, -1.1, entities(1)[0]);
    let mut sensor = EnvironmentSensor::default();
    assert!(sense(&mut sensor, &floor, 0.0).below);

    sensor.suspend_ground_check(0.0);
    assert!(!sensor.contact().below);
    assert!(sensor.is_ground_check_suspended());

    let during = sense(&mut sensor, &floor, 0.05);
    assert!(!during.below);
    assert_eq!(during.ground_type, GroundType::None);

    let after = sense(&mut sensor, &floor, 0.2);
    assert!(!sensor.is_ground_check_suspended());
    assert!(after.below);
    assert!(after.hit_ground_this_frame);
}

// -----------------------------------------------------------------------------
// Integration tests
// -----------------------------------------------------------------------------

#[test]
fn test_displacement_is_applied_in_open_space() {
    let mut sensor = EnvironmentSensor::default();
    let mut position = Vec2::new(3.0, 4.0);

    sensor.advance(
        &mut position,
        &body(),
        Vec2::new(0.5, -0.25),
        0.0,
        &TestWorld::default(),
        &Effectors::default(),
    );

    assert!((position - Vec2::new(3.5, 3.75)).length() < 1e-5);
}

#[test]
fn test_fall_stops_at_floor_and_slides_horizontally() {
    let world = TestWorld::default().with(Side::Floor, -2.0, entities(1)[0]);
    let mut sensor = EnvironmentSensor::default();
    let mut position = Vec2::ZERO;

    let contact = sensor.advance(
        &mut position,
        &body(),
        Vec2::new(1.0, -5.0),
        0.0,
        &world,
        &Effectors::default(),
    );

    // Stops within the skin gap above the floor
    let skin = sensor.tuning.skin_width;
    assert!(position.y > -1.0 && position.y <= -1.0 + skin);
    assert!((position.x - 1.0).abs() < 1e-4);
    assert!(contact.below);
    assert!(contact.hit_ground_this_frame);
}

#[test]
fn test_one_way_platform_does_not_block_upward_motion() {
    let world = TestWorld::default()
        .with_platform(1.5, entities(1)[0])
        .with(Side::Ceiling, 10.0, entities(1)[0]);
    let mut sensor = EnvironmentSensor::default();
    let mut position = Vec2::ZERO;

    sensor.advance(
        &mut position,
        &body(),
        Vec2::new(0.0, 3.0),
        0.0,
        &world,
        &Effectors::default(),
    );

    assert!((position.y - 3.0).abs() < 1e-5);
}

#[test]
fn test_offset_is_applied_without_a_sweep() {
    let world = TestWorld::default()
        .with(Side::Ceiling, 1.2, entities(1)[0])
        .with(Side::Floor, -3.0, entities(1)[0]);
    let mut sensor = EnvironmentSensor::default();
    let mut position = Vec2::ZERO;

    sensor.advance(
        &mut position,
        &body(),
        PendingDisplacement {
            motion: Vec2::ZERO,
            offset: Vec2::new(0.0, 0.5),
        },
        0.0,
        &world,
        &Effectors::default(),
    );
    assert!((position.y - 0.5).abs() < 1e-6);

    // Motion is swept from where the offset left the body
    sensor.advance(
        &mut position,
        &body(),
        PendingDisplacement {
            motion: Vec2::new(0.0, -5.0),
            offset: Vec2::new(0.0, -0.5),
        },
        0.0,
        &world,
        &Effectors::default(),
    );
    let skin = sensor.tuning.skin_width;
    assert!(position.y > -2.0 && position.y <= -2.0 + skin);
}

#[test]
fn test_follow_slope_pushes_down_only_when_moving_downhill() {
    let world = TestWorld::default().with_sloped_floor(-1.1, 30.0, entities(1)[0]);
    let mut sensor = EnvironmentSensor::default();
    assert!(sense(&mut sensor, &world, 0.0).below);

    let downhill = sensor.follow_slope(Vec2::new(1.0, 0.0));
    let expected = -(30f32.to_radians().tan()) * sensor.tuning.down_force_adjustment;
    assert!((downhill.y - expected).abs() < 1e-4);

    let uphill = sensor.follow_slope(Vec2::new(-1.0, 0.0));
    assert_eq!(uphill, Vec2::new(-1.0, 0.0));
}

#[test]
fn test_follow_slope_ignored_when_airborne() {
    let mut sensor = EnvironmentSensor::default();
    sense(&mut sensor, &TestWorld::default(), 0.0);

    assert_eq!(sensor.follow_slope(Vec2::new(2.0, -1.0)), Vec2::new(2.0, -1.0));
}

// -----------------------------------------------------------------------------
// Body and headroom tests
// -----------------------------------------------------------------------------

#[test]
fn test_body_rejects_invalid_sizes() {
    for size in [Vec2::ZERO, Vec2::new(1.0, -2.0), Vec2::new(f32::NAN, 2.0)] {
        assert!(matches!(
            CharacterBody::new(size),
            Err(SetupError::InvalidColliderSize { .. })
        ));
    }
}

#[test]
fn test_body_crouch_keeps_feet_planted() {
    let mut body = body();

    let down = body.shrink_to_crouch();
    assert!(body.is_crouched());
    assert_eq!(body.size(), Vec2::new(1.0, 1.0));
    // Feet stay at center - height / 2
    assert!(((0.0 + down) - body.size().y * 0.5 - (-1.0)).abs() < 1e-6);

    let up = body.restore_standing();
    assert!(!body.is_crouched());
    assert_eq!(down + up, 0.0);
    assert_eq!(body.standing_clearance(), 1.0);
}

#[test]
fn test_cast_headroom_detects_low_ceiling() {
    let mut crouched = body();
    crouched.shrink_to_crouch();
    let sensor = EnvironmentSensor::default();

    // Crouched body centered at y = -0.5 spans [-1, 0]
    let low = TestWorld::default().with(Side::Ceiling, 0.6, entities(1)[0]);
    let high = TestWorld::default().with(Side::Ceiling, 1.5, entities(1)[0]);

    let blocked: CastHeadroom<'_, TestWorld> = sensor.headroom(&low, Vec2::new(0.0, -0.5));
    assert!(blocked.headroom_blocked(&crouched, crouched.standing_clearance()));

    let clear = sensor.headroom(&high, Vec2::new(0.0, -0.5));
    assert!(!clear.headroom_blocked(&crouched, crouched.standing_clearance()));
}

// -----------------------------------------------------------------------------
// App tests
// -----------------------------------------------------------------------------

fn physics_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        TransformPlugin,
        PhysicsPlugins::default(),
        SensingPlugin,
    ))
    .init_resource::<Assets<Mesh>>()
    .init_resource::<bevy::scene::SceneSpawner>()
    .insert_resource(Time::<Fixed>::from_hz(60.0))
    .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));
    app.finish();
    app.cleanup();
    app
}

fn spawn_character(app: &mut App, at: Vec2) -> Entity {
    let body = body();
    app.world_mut()
        .spawn((
            body,
            EnvironmentSensor::default(),
            EnvironmentContact::default(),
            PendingDisplacement::default(),
            Transform::from_translation(at.extend(0.0)),
            RigidBody::Kinematic,
            body.collider(),
            player_layers(),
        ))
        .id()
}

/// Queue the same motion before every update.
fn drive(app: &mut App, character: Entity, motion: Vec2, updates: usize) {
    for _ in 0..updates {
        app.world_mut()
            .entity_mut(character)
            .insert(PendingDisplacement::from(motion));
        app.update();
    }
}

fn contact_and_position(app: &App, character: Entity) -> (EnvironmentContact, Vec2) {
    let world = app.world();
    let contact = *world.get::<EnvironmentContact>(character).unwrap();
    let position = world.get::<Transform>(character).unwrap().translation.truncate();
    (contact, position)
}

#[test]
fn test_app_lands_on_one_way_platform() {
    let mut app = physics_app();
    app.world_mut().spawn((
        GroundEffector::one_way_platform(),
        RigidBody::Static,
        Collider::rectangle(20.0, 0.5),
        Transform::from_xyz(0.0, -0.25, 0.0),
        CollisionLayers::new(GameLayer::Platform, [GameLayer::Player]),
    ));
    let character = spawn_character(&mut app, Vec2::new(0.0, 3.0));

    drive(&mut app, character, Vec2::new(0.0, -0.1), 60);

    let (contact, position) = contact_and_position(&app, character);
    assert!(contact.below);
    assert_eq!(contact.ground_type, GroundType::OneWayPlatform);
    assert!((position.y - 1.0).abs() < 0.05);
}

#[test]
fn test_app_wall_stops_motion_and_sets_side() {
    let mut app = physics_app();
    // Wall face at x = 0.6
    app.world_mut().spawn((
        RigidBody::Static,
        Collider::rectangle(1.0, 10.0),
        Transform::from_xyz(1.1, 0.0, 0.0),
        CollisionLayers::new(GameLayer::Wall, [GameLayer::Player]),
    ));
    let character = spawn_character(&mut app, Vec2::new(-2.0, 0.0));

    drive(&mut app, character, Vec2::new(0.2, 0.0), 30);

    let (contact, position) = contact_and_position(&app, character);
    assert!(contact.right);
    assert!(!contact.left);
    assert!(!contact.below);
    assert!(position.x < 0.1 && position.x > 0.0);
}

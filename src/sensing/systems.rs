//! Sensing domain: systems that drive sensors from the ECS.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::sensing::{
    CharacterBody, EnvironmentContact, EnvironmentSensor, GroundEffector, PendingDisplacement,
    SetupError, SpatialCaster,
};

pub(crate) fn advance_sensors(
    time: Res<Time>,
    spatial_query: SpatialQuery,
    effectors: Query<&GroundEffector>,
    mut query: Query<(
        Entity,
        &mut Transform,
        &CharacterBody,
        &mut EnvironmentSensor,
        &mut EnvironmentContact,
        &mut PendingDisplacement,
    )>,
) {
    let now = time.elapsed_secs_f64();

    for (entity, mut transform, body, mut sensor, mut contact, mut pending) in &mut query {
        let caster = SpatialCaster::new(&spatial_query, entity);
        let mut position = transform.translation.truncate();

        *contact = sensor.advance(
            &mut position,
            body,
            pending.take(),
            now,
            &caster,
            &effectors,
        );

        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

/// Report sensors that were spawned without a body to sense with.
pub(crate) fn verify_sensor_setup(
    query: Query<Entity, (Added<EnvironmentSensor>, Without<CharacterBody>)>,
) {
    for entity in &query {
        error!("{}", SetupError::MissingBody { entity });
    }
}

/// Draw the contact probes, green when they hit.
#[cfg(feature = "dev-tools")]
pub(crate) fn draw_sensor_probes(
    mut gizmos: Gizmos,
    query: Query<(&Transform, &CharacterBody, &EnvironmentSensor, &EnvironmentContact)>,
) {
    let hit_color = Color::srgb(0.2, 0.9, 0.3);
    let miss_color = Color::srgb(0.9, 0.25, 0.2);

    for (transform, body, sensor, contact) in &query {
        let center = transform.translation.truncate();
        let half = body.size() * 0.5;
        let probe = sensor.tuning.probe_distance;

        let probes = [
            (Vec2::new(0.0, -half.y), Vec2::NEG_Y * probe, contact.below),
            (Vec2::new(0.0, half.y), Vec2::Y * probe, contact.above),
            (Vec2::new(-half.x, 0.0), Vec2::NEG_X * probe * 2.0, contact.left),
            (Vec2::new(half.x, 0.0), Vec2::X * probe * 2.0, contact.right),
        ];

        for (offset, reach, hit) in probes {
            let start = center + offset;
            let color = if hit { hit_color } else { miss_color };
            gizmos.line_2d(start, start + reach, color);
        }
    }
}

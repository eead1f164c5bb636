//! Movement domain: runs the locomotion state machine for player characters.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{AbilityToggles, LocomotionInput, LocomotionState, LocomotionTuning, Player};
use crate::sensing::{
    CharacterBody, EnvironmentContact, EnvironmentSensor, PendingDisplacement, SpatialCaster,
};
use crate::timing::SimClock;

pub(crate) fn tick_locomotion(
    mut commands: Commands,
    time: Res<Time>,
    spatial_query: SpatialQuery,
    input: Res<LocomotionInput>,
    tuning: Res<LocomotionTuning>,
    abilities: Res<AbilityToggles>,
    mut query: Query<
        (
            Entity,
            &Transform,
            &EnvironmentContact,
            &mut CharacterBody,
            &mut EnvironmentSensor,
            &mut LocomotionState,
            &mut PendingDisplacement,
        ),
        With<Player>,
    >,
) {
    let clock = SimClock::from_time(&time);
    let frame = input.tick_input();

    for (entity, transform, contact, mut body, mut sensor, mut state, mut pending) in &mut query {
        let caster = SpatialCaster::new(&spatial_query, entity);
        let headroom = sensor.headroom(&caster, transform.translation.truncate());
        let size_before = body.size();

        let out = state.tick(
            &tuning,
            &abilities,
            &frame,
            contact,
            &mut body,
            &headroom,
            clock,
        );

        pending.motion += out.displacement;
        pending.offset.y += out.posture_shift;

        if out.suspend_ground_check {
            sensor.suspend_ground_check(clock.now);
        }

        // SpatialQuery already reads colliders, so the resize goes through commands
        if body.size() != size_before {
            commands.entity(entity).insert(body.collider());
            debug!("Collider resized to {} ({:?})", body.size(), state.posture);
        }
    }
}

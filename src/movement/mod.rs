//! Movement domain: ability state machine and its plugin wiring.

mod components;
mod machine;
mod resources;
mod systems;

#[cfg(feature = "dev-tools")]
pub mod dev;


pub use components::{Facing, JumpPhase, LocomotionState, Player, Posture, VerticalMode};
pub use machine::{TickInput, TickOutput, apply_deadzone};
pub use resources::{AbilityToggles, LocomotionInput, LocomotionTuning};

use bevy::prelude::*;

use crate::LocomotionSet;
use crate::movement::systems::{consume_input_edges, read_input, tick_locomotion};
use crate::sensing::SensingPlugin;

pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(SensingPlugin)
            .init_resource::<LocomotionTuning>()
            .init_resource::<AbilityToggles>()
            .init_resource::<LocomotionInput>()
            .register_type::<LocomotionTuning>()
            .register_type::<AbilityToggles>()
            .register_type::<LocomotionState>()
            .configure_sets(
                FixedUpdate,
                (LocomotionSet::Sense, LocomotionSet::Decide).chain(),
            )
            .add_systems(
                Update,
                read_input.run_if(resource_exists::<ButtonInput<KeyCode>>),
            )
            .add_systems(
                FixedUpdate,
                (tick_locomotion, consume_input_edges)
                    .chain()
                    .in_set(LocomotionSet::Decide),
            );
    }
}

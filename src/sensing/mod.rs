//! Sensing domain: moves characters and reports what they touch.

mod avian;
mod body;
mod contact;
pub mod layers;
mod probe;
mod sensor;
mod systems;

#[cfg(test)]
mod tests;

pub use avian::{GroundEffector, SpatialCaster};
pub use body::{CharacterBody, SetupError};
pub use contact::{
    EnvironmentContact, GroundType, PreviousContact, WallSide, is_walkable, signed_slope_angle,
};
pub use layers::GameLayer;
pub use probe::{
    CastHeadroom, GroundEffectorQuery, HeadroomProbe, ProbeShape, ShapeCaster, SurfaceHit,
};
pub use sensor::{EnvironmentSensor, PendingDisplacement, SensorTuning};

use bevy::prelude::*;

use crate::LocomotionSet;
use crate::sensing::systems::{advance_sensors, verify_sensor_setup};

#[cfg(feature = "dev-tools")]
pub(crate) use systems::draw_sensor_probes;

pub struct SensingPlugin;

impl Plugin for SensingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SensorTuning>()
            .register_type::<SensorTuning>()
            .register_type::<EnvironmentContact>()
            .register_type::<CharacterBody>()
            .register_type::<PendingDisplacement>()
            .register_type::<GroundEffector>()
            .add_systems(
                FixedUpdate,
                (verify_sensor_setup, advance_sensors)
                    .chain()
                    .in_set(LocomotionSet::Sense),
            );
    }
}

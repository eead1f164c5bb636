//! Data definitions for the locomotion config file.

use serde::{Deserialize, Serialize};

use crate::movement::{AbilityToggles, LocomotionTuning};
use crate::sensing::SensorTuning;

/// Schema version the loader accepts
pub const LOCOMOTION_SCHEMA_VERSION: u32 = 1;

/// Contents of `locomotion.ron`: every tunable of the locomotion core.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LocomotionDefaults {
    pub schema_version: u32,
    #[serde(default)]
    pub sensor: SensorTuning,
    #[serde(default)]
    pub movement: LocomotionTuning,
    #[serde(default)]
    pub abilities: AbilityToggles,
}

impl LocomotionDefaults {
    /// Built-in values, used when no config file is available.
    pub fn builtin() -> Self {
        Self {
            schema_version: LOCOMOTION_SCHEMA_VERSION,
            ..Default::default()
        }
    }
}

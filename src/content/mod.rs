//! Content domain: loading and validating the locomotion config.

mod data;
mod loader;
mod validation;

#[cfg(test)]
mod tests;

pub use data::{LOCOMOTION_SCHEMA_VERSION, LocomotionDefaults};
pub use loader::{
    ContentLoadError, LOCOMOTION_FILE, check_schema, load_locomotion_defaults, parse_single,
};
pub use validation::{ValidationError, validate_locomotion};

use bevy::prelude::*;
use std::path::{Path, PathBuf};

/// Loads `locomotion.ron` and installs its tunables as resources.
pub struct ContentPlugin {
    pub base_path: PathBuf,
}

impl Default for ContentPlugin {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("assets/data"),
        }
    }
}

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        let defaults = load_or_builtin(&self.base_path);

        app.insert_resource(defaults.sensor)
            .insert_resource(defaults.movement)
            .insert_resource(defaults.abilities);
    }
}

/// Load and validate the locomotion config, falling back to built-in values
/// when the file is missing, malformed or out of range.
pub fn load_or_builtin(base_path: &Path) -> LocomotionDefaults {
    let defaults = match load_locomotion_defaults(base_path) {
        Ok(defaults) => defaults,
        Err(e) => {
            error!("{}", e);
            warn!("Using built-in locomotion defaults");
            return LocomotionDefaults::builtin();
        }
    };

    let errors = validate_locomotion(&defaults);
    if !errors.is_empty() {
        for e in &errors {
            error!("Invalid locomotion config: {}", e);
        }
        warn!(
            "Using built-in locomotion defaults ({} invalid values)",
            errors.len()
        );
        return LocomotionDefaults::builtin();
    }

    info!(
        "Loaded locomotion config from {}: walk={}, jump={}, gravity={}",
        base_path.join(LOCOMOTION_FILE).display(),
        defaults.movement.walk_speed,
        defaults.movement.jump_speed,
        defaults.movement.gravity
    );
    defaults
}

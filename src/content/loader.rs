//! Loader for the locomotion RON config at startup.

use ron::Options;
use std::fs;
use std::path::Path;

use super::data::{LOCOMOTION_SCHEMA_VERSION, LocomotionDefaults};

/// File name of the locomotion config inside the data directory
pub const LOCOMOTION_FILE: &str = "locomotion.ron";

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse a single RON struct from a string, attributing errors to `file_name`.
pub fn parse_single<T>(contents: &str, file_name: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file_name.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load a single RON struct from disk.
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_single(&contents, &file_name)
}

/// Check a parsed config was written for this schema.
pub fn check_schema(
    defaults: LocomotionDefaults,
    file_name: &str,
) -> Result<LocomotionDefaults, ContentLoadError> {
    if defaults.schema_version != LOCOMOTION_SCHEMA_VERSION {
        return Err(ContentLoadError {
            file: file_name.to_string(),
            message: format!(
                "Unsupported schema_version {} (expected {})",
                defaults.schema_version, LOCOMOTION_SCHEMA_VERSION
            ),
        });
    }
    Ok(defaults)
}

/// Load `locomotion.ron` from `base_path`.
pub fn load_locomotion_defaults(base_path: &Path) -> Result<LocomotionDefaults, ContentLoadError> {
    let path = base_path.join(LOCOMOTION_FILE);
    let defaults = load_single_file::<LocomotionDefaults>(&path)?;
    check_schema(defaults, &path.display().to_string())
}

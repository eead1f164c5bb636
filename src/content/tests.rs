//! Content domain: tests for config parsing, schema checks and validation.

use std::path::Path;

use super::{
    LOCOMOTION_SCHEMA_VERSION, LocomotionDefaults, check_schema, load_locomotion_defaults,
    load_or_builtin, parse_single, validate_locomotion,
};

const SHIPPED_CONFIG: &str = include_str!("../../assets/data/locomotion.ron");

// -----------------------------------------------------------------------------
// Parsing tests
// -----------------------------------------------------------------------------

#[test]
fn test_shipped_config_parses_and_validates() {
    let defaults: LocomotionDefaults =
        parse_single(SHIPPED_CONFIG, "locomotion.ron").expect("shipped config should parse");
    let defaults = check_schema(defaults, "locomotion.ron").expect("schema should match");

    assert!(validate_locomotion(&defaults).is_empty());
    assert!(defaults.abilities.can_double_jump);
    assert_eq!(defaults.sensor.slope_angle_limit, 45.0);
    assert_eq!(defaults.movement.dash_cool_down_time, 1.0);
}

#[test]
fn test_shipped_config_matches_builtin_tuning() {
    let defaults: LocomotionDefaults = parse_single(SHIPPED_CONFIG, "locomotion.ron").unwrap();
    let builtin = LocomotionDefaults::builtin();

    assert_eq!(defaults.sensor, builtin.sensor);
    assert_eq!(defaults.movement, builtin.movement);
}

#[test]
fn test_partial_config_fills_missing_fields_with_defaults() {
    let contents = "(schema_version: 1, movement: (walk_speed: 12.5))";
    let defaults: LocomotionDefaults = parse_single(contents, "partial.ron").unwrap();

    assert_eq!(defaults.movement.walk_speed, 12.5);
    assert_eq!(defaults.movement.jump_speed, 50.0);
    assert_eq!(defaults.sensor.probe_distance, 0.2);
    assert!(!defaults.abilities.can_glide);
}

#[test]
fn test_malformed_config_reports_file_name() {
    let err = parse_single::<LocomotionDefaults>("(schema_version: ", "broken.ron").unwrap_err();

    assert_eq!(err.file, "broken.ron");
    assert!(err.message.starts_with("Parse error"));
}

#[test]
fn test_wrong_schema_version_is_rejected() {
    let defaults = LocomotionDefaults {
        schema_version: LOCOMOTION_SCHEMA_VERSION + 1,
        ..LocomotionDefaults::builtin()
    };

    let err = check_schema(defaults, "locomotion.ron").unwrap_err();
    assert!(err.message.contains("schema_version"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_locomotion_defaults(Path::new("/nonexistent/locomotion/data")).unwrap_err();
    assert!(err.message.starts_with("IO error"));
}

#[test]
fn test_load_or_builtin_falls_back_when_missing() {
    let defaults = load_or_builtin(Path::new("/nonexistent/locomotion/data"));
    assert_eq!(defaults, LocomotionDefaults::builtin());
}

// -----------------------------------------------------------------------------
// Validation tests
// -----------------------------------------------------------------------------

#[test]
fn test_builtin_defaults_are_valid() {
    assert!(validate_locomotion(&LocomotionDefaults::builtin()).is_empty());
}

#[test]
fn test_negative_durations_are_reported() {
    let mut defaults = LocomotionDefaults::builtin();
    defaults.movement.dash_time = -0.2;
    defaults.movement.wall_run_time = -1.0;

    let errors = validate_locomotion(&defaults);
    let fields: Vec<_> = errors.iter().map(|e| e.field).collect();

    assert_eq!(errors.len(), 2);
    assert!(fields.contains(&"dash_time"));
    assert!(fields.contains(&"wall_run_time"));
    assert!(errors.iter().all(|e| e.section == "movement"));
}

#[test]
fn test_slope_limit_out_of_range_is_reported() {
    let mut defaults = LocomotionDefaults::builtin();
    defaults.sensor.slope_angle_limit = 120.0;

    let errors = validate_locomotion(&defaults);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].section, "sensor");
    assert_eq!(errors[0].field, "slope_angle_limit");
}

#[test]
fn test_non_finite_values_are_reported() {
    let mut defaults = LocomotionDefaults::builtin();
    defaults.movement.gravity = f32::NAN;
    defaults.sensor.probe_distance = f32::INFINITY;

    assert_eq!(validate_locomotion(&defaults).len(), 2);
}

#[test]
fn test_deadzone_must_stay_below_one() {
    let mut defaults = LocomotionDefaults::builtin();
    defaults.movement.deadzone = 1.0;

    let errors = validate_locomotion(&defaults);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "deadzone");
}

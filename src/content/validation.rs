//! Validation of locomotion tunables before they reach the simulation.

use super::data::LocomotionDefaults;

/// A validation error with context about what failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub section: &'static str,
    pub field: &'static str,
    pub value: f32,
    pub expected: &'static str,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} = {} is out of range (expected {})",
            self.section, self.field, self.value, self.expected
        )
    }
}

impl std::error::Error for ValidationError {}

/// Helper macro for checking a value against a range predicate
macro_rules! check {
    ($errors:expr, $section:expr, $owner:expr, $field:ident, $expected:expr, |$v:ident| $cond:expr) => {
        let $v = $owner.$field;
        if !($v.is_finite() && $cond) {
            $errors.push(ValidationError {
                section: $section,
                field: stringify!($field),
                value: $v,
                expected: $expected,
            });
        }
    };
}

macro_rules! check_non_negative {
    ($errors:expr, $section:expr, $owner:expr, $($field:ident),+ $(,)?) => {
        $( check!($errors, $section, $owner, $field, ">= 0", |v| v >= 0.0); )+
    };
}

/// Validate every tunable in the locomotion config.
/// Returns a list of validation errors, empty if all values are usable.
pub fn validate_locomotion(defaults: &LocomotionDefaults) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Sensor
    let sensor = &defaults.sensor;
    check!(errors, "sensor", sensor, probe_distance, "> 0", |v| v > 0.0);
    check!(errors, "sensor", sensor, slope_angle_limit, "in (0, 90]", |v| v > 0.0 && v <= 90.0);
    check!(errors, "sensor", sensor, lateral_probe_scale, "in (0, 1]", |v| v > 0.0 && v <= 1.0);
    check_non_negative!(
        errors,
        "sensor",
        sensor,
        down_force_adjustment,
        ground_check_cooldown,
        skin_width,
    );

    // Movement
    let movement = &defaults.movement;
    check!(errors, "movement", movement, gravity, "> 0", |v| v > 0.0);
    check!(errors, "movement", movement, deadzone, "in [0, 1)", |v| v >= 0.0 && v < 1.0);
    check!(errors, "movement", movement, wall_slide_amount, "in [0, 1]", |v| v >= 0.0 && v <= 1.0);
    check_non_negative!(
        errors,
        "movement",
        movement,
        walk_speed,
        creep_speed,
        jump_speed,
        extra_jump_speed,
        x_wall_jump_speed,
        y_wall_jump_speed,
        wall_jump_time,
        wall_run_amount,
        wall_run_time,
        glide_time,
        glide_descent_amount,
        power_jump_speed,
        power_jump_wait_time,
        power_jump_time,
        dash_speed,
        dash_time,
        dash_cool_down_time,
        ground_slam_speed,
        crouch_clear_delay,
    );

    errors
}

//! Movement domain: tuning, ability toggles and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::TickInput;

#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct LocomotionTuning {
    pub walk_speed: f32,
    pub creep_speed: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    /// Launch speed of double and triple jumps
    pub extra_jump_speed: f32,
    pub x_wall_jump_speed: f32,
    pub y_wall_jump_speed: f32,
    /// Seconds horizontal input is ignored after a wall jump
    pub wall_jump_time: f32,
    pub wall_run_amount: f32,
    pub wall_run_time: f32,
    /// Fraction of gravity applied while sliding down a wall
    pub wall_slide_amount: f32,
    pub glide_time: f32,
    pub glide_descent_amount: f32,
    /// Gliding starts only below this vertical velocity
    pub glide_entry_threshold: f32,
    pub power_jump_speed: f32,
    /// Crouch hold needed before a jump becomes a power jump
    pub power_jump_wait_time: f32,
    pub power_jump_time: f32,
    pub dash_speed: f32,
    pub dash_time: f32,
    pub dash_cool_down_time: f32,
    pub ground_slam_speed: f32,
    /// Delay before re-checking headroom when leaving the ground crouched
    pub crouch_clear_delay: f32,
    pub deadzone: f32,
}

impl Default for LocomotionTuning {
    fn default() -> Self {
        Self {
            walk_speed: 20.0,
            creep_speed: 10.0,
            gravity: 150.0,
            jump_speed: 50.0,
            extra_jump_speed: 40.0,
            x_wall_jump_speed: 50.0,
            y_wall_jump_speed: 50.0,
            wall_jump_time: 0.4,
            wall_run_amount: 10.0,
            wall_run_time: 0.5,
            wall_slide_amount: 0.1,
            glide_time: 2.0,
            glide_descent_amount: 2.0,
            glide_entry_threshold: 0.2,
            power_jump_speed: 100.0,
            power_jump_wait_time: 0.8,
            power_jump_time: 0.8,
            dash_speed: 20.0,
            dash_time: 0.2,
            dash_cool_down_time: 1.0,
            ground_slam_speed: 100.0,
            crouch_clear_delay: 0.05,
            deadzone: 0.15,
        }
    }
}

impl LocomotionTuning {
    /// Apex height of a single ground jump: h = v² / (2g)
    pub fn single_jump_height(&self) -> f32 {
        self.jump_speed * self.jump_speed / (2.0 * self.gravity)
    }

    /// Apex height of a power jump.
    pub fn power_jump_height(&self) -> f32 {
        self.power_jump_speed * self.power_jump_speed / (2.0 * self.gravity)
    }
}

/// Which abilities the character has unlocked
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct AbilityToggles {
    pub can_double_jump: bool,
    pub can_triple_jump: bool,
    pub can_wall_jump: bool,
    /// Wall jumps give back the double and triple jump
    pub can_jump_after_wall_jump: bool,
    pub can_wall_run: bool,
    pub can_multiple_wall_run: bool,
    pub can_wall_slide: bool,
    pub can_glide: bool,
    pub can_glide_after_wall_contact: bool,
    pub can_power_jump: bool,
    pub can_ground_dash: bool,
    pub can_air_dash: bool,
    pub can_ground_slam: bool,
}

impl AbilityToggles {
    /// Every ability unlocked.
    pub fn all() -> Self {
        Self {
            can_double_jump: true,
            can_triple_jump: true,
            can_wall_jump: true,
            can_jump_after_wall_jump: true,
            can_wall_run: true,
            can_multiple_wall_run: true,
            can_wall_slide: true,
            can_glide: true,
            can_glide_after_wall_contact: true,
            can_power_jump: true,
            can_ground_dash: true,
            can_air_dash: true,
            can_ground_slam: true,
        }
    }
}

/// Player input, latched between fixed steps.
///
/// Edges stay set until a fixed step consumes them so presses are not
/// lost when several frames run between steps.
#[derive(Resource, Debug, Default)]
pub struct LocomotionInput {
    pub axis: Vec2,
    pub jump_just_pressed: bool,
    pub jump_just_released: bool,
    pub dash_just_pressed: bool,
    pub attack_just_pressed: bool,
}

impl LocomotionInput {
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            axis: self.axis,
            jump_pressed: self.jump_just_pressed,
            jump_released: self.jump_just_released,
            dash_pressed: self.dash_just_pressed,
            attack_pressed: self.attack_just_pressed,
        }
    }

    pub fn consume_edges(&mut self) {
        self.jump_just_pressed = false;
        self.jump_just_released = false;
        self.dash_just_pressed = false;
        self.attack_just_pressed = false;
    }
}

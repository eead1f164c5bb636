//! Movement domain: locomotion state and the per-axis ability enums.

use bevy::prelude::*;

use crate::timing::TimedWindow;

#[derive(Component, Debug)]
pub struct Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Facing for a horizontal direction sign.
    pub fn from_sign(sign: f32) -> Self {
        if sign < 0.0 { Facing::Left } else { Facing::Right }
    }
}

/// How far into the jump chain the current airborne phase is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Reflect)]
pub enum JumpPhase {
    #[default]
    Grounded,
    Jumped,
    DoubleJumped,
    TripleJumped,
}

/// Stance the presentation layer maps to visuals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Posture {
    #[default]
    Standing,
    Crouching,
    /// Crouched and moving
    Creeping,
}

impl Posture {
    pub fn is_crouched(self) -> bool {
        matches!(self, Posture::Crouching | Posture::Creeping)
    }
}

/// Which rule drove vertical velocity on the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum VerticalMode {
    #[default]
    Normal,
    WallSliding,
    Gliding,
    GroundSlamming,
    Dashing,
}

/// Ability state owned by the locomotion state machine.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct LocomotionState {
    /// Velocity-like vector, persists and accumulates across ticks
    pub move_direction: Vec2,
    pub facing: Facing,
    pub jump_phase: JumpPhase,
    pub posture: Posture,
    pub vertical_mode: VerticalMode,
    pub ground_slamming: bool,
    pub able_to_wall_run: bool,
    /// Set until the first glide tick of an airborne phase
    pub start_glide: bool,
    pub current_glide_time: f32,
    /// Seconds the crouch has been held, charging a power jump
    pub power_jump_timer: f32,
    /// Dash cooldown countdown
    pub dash_timer: f32,
    pub wall_jump: TimedWindow,
    pub wall_run: TimedWindow,
    pub power_jump: TimedWindow,
    pub dash: TimedWindow,
    pub crouch_clear: TimedWindow,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self {
            move_direction: Vec2::ZERO,
            facing: Facing::Right,
            jump_phase: JumpPhase::Grounded,
            posture: Posture::Standing,
            vertical_mode: VerticalMode::Normal,
            ground_slamming: false,
            able_to_wall_run: true,
            start_glide: true,
            current_glide_time: 0.0,
            power_jump_timer: 0.0,
            dash_timer: 0.0,
            wall_jump: TimedWindow::default(),
            wall_run: TimedWindow::default(),
            power_jump: TimedWindow::default(),
            dash: TimedWindow::default(),
            crouch_clear: TimedWindow::default(),
        }
    }
}

impl LocomotionState {
    pub fn is_jumping(&self) -> bool {
        self.jump_phase != JumpPhase::Grounded
    }

    pub fn is_double_jumping(&self) -> bool {
        self.jump_phase >= JumpPhase::DoubleJumped
    }

    pub fn is_triple_jumping(&self) -> bool {
        self.jump_phase == JumpPhase::TripleJumped
    }

    pub fn is_wall_jumping(&self) -> bool {
        self.wall_jump.is_active()
    }

    pub fn is_wall_running(&self) -> bool {
        self.wall_run.is_active()
    }

    pub fn is_wall_sliding(&self) -> bool {
        self.vertical_mode == VerticalMode::WallSliding
    }

    pub fn is_crouching(&self) -> bool {
        self.posture.is_crouched()
    }

    pub fn is_creeping(&self) -> bool {
        self.posture == Posture::Creeping
    }

    pub fn is_gliding(&self) -> bool {
        self.vertical_mode == VerticalMode::Gliding
    }

    pub fn is_power_jumping(&self) -> bool {
        self.power_jump.is_active()
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_active()
    }

    pub fn is_ground_slamming(&self) -> bool {
        self.ground_slamming
    }

    pub fn facing_right(&self) -> bool {
        self.facing == Facing::Right
    }
}

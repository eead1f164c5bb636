//! Movement domain: the per-tick locomotion state machine.
//!
//! One call to [`LocomotionState::tick`] per fixed step turns input and the
//! sensor's contact snapshot into the displacement for the next step. Every
//! delayed effect is a [`TimedWindow`](crate::timing::TimedWindow) checked
//! at the start of the tick.

use bevy::prelude::*;

use crate::movement::{
    AbilityToggles, Facing, JumpPhase, LocomotionState, LocomotionTuning, Posture, VerticalMode,
};
use crate::sensing::{CharacterBody, EnvironmentContact, GroundType, HeadroomProbe, WallSide};
use crate::timing::SimClock;

/// Input delivered to one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    pub axis: Vec2,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub dash_pressed: bool,
    pub attack_pressed: bool,
}

/// What a tick asks of the sensor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickOutput {
    /// Movement to sweep on the next sensor step
    pub displacement: Vec2,
    /// Vertical correction that keeps the feet planted across a posture change
    pub posture_shift: f32,
    /// A jump launched and the ground just left should be ignored for a moment
    pub suspend_ground_check: bool,
}

/// Zero each axis whose magnitude is inside the deadzone.
pub fn apply_deadzone(axis: Vec2, deadzone: f32) -> Vec2 {
    let filter = |value: f32| if value.abs() < deadzone { 0.0 } else { value };
    Vec2::new(filter(axis.x), filter(axis.y))
}

impl LocomotionState {
    pub fn new(tuning: &LocomotionTuning) -> Self {
        Self {
            current_glide_time: tuning.glide_time,
            ..default()
        }
    }

    /// Advance the state machine by one fixed step.
    #[allow(clippy::too_many_arguments)]
    pub fn tick<H: HeadroomProbe>(
        &mut self,
        tuning: &LocomotionTuning,
        abilities: &AbilityToggles,
        input: &TickInput,
        contact: &EnvironmentContact,
        body: &mut CharacterBody,
        headroom: &H,
        clock: SimClock,
    ) -> TickOutput {
        let mut out = TickOutput::default();

        if self.dash_timer > 0.0 {
            self.dash_timer = (self.dash_timer - clock.dt).max(0.0);
        }
        out.posture_shift += self.expire_windows(tuning, abilities, body, headroom, clock);

        let axis = apply_deadzone(input.axis, tuning.deadzone);

        self.try_dash(tuning, abilities, input, contact, clock);

        if input.attack_pressed && axis.y < 0.0 && abilities.can_ground_slam {
            self.ground_slamming = true;
            debug!("Ground slam armed");
        }

        self.resolve_horizontal(tuning, axis);

        if contact.below {
            self.on_ground(tuning, abilities, input, contact, body, headroom, axis, clock, &mut out);
        } else {
            self.in_air(tuning, abilities, input, contact, axis, clock);
        }

        out.displacement += self.move_direction * clock.dt;
        out
    }

    /// Close elapsed windows and apply their effects. Returns any posture shift.
    fn expire_windows<H: HeadroomProbe>(
        &mut self,
        tuning: &LocomotionTuning,
        abilities: &AbilityToggles,
        body: &mut CharacterBody,
        headroom: &H,
        clock: SimClock,
    ) -> f32 {
        let now = clock.now;

        if self.dash.expire(now) {
            self.dash_timer = tuning.dash_cool_down_time;
            debug!("Dash finished, cooldown {:.2}s", self.dash_timer);
        }

        self.wall_jump.expire(now);
        self.power_jump.expire(now);

        if self.wall_run.expire(now) && !abilities.can_multiple_wall_run {
            self.able_to_wall_run = false;
        }

        if self.crouch_clear.expire(now) && self.posture.is_crouched() {
            if headroom.headroom_blocked(body, body.standing_clearance()) {
                self.crouch_clear.open(now, tuning.crouch_clear_delay);
            } else {
                return self.stand_up(body);
            }
        }

        0.0
    }

    fn try_dash(
        &mut self,
        tuning: &LocomotionTuning,
        abilities: &AbilityToggles,
        input: &TickInput,
        contact: &EnvironmentContact,
        clock: SimClock,
    ) {
        if !input.dash_pressed || self.dash_timer > 0.0 || self.is_dashing() {
            return;
        }

        let allowed = (abilities.can_air_dash && !contact.below)
            || (abilities.can_ground_dash && contact.below);
        if allowed {
            self.dash.open(clock.now, tuning.dash_time);
            debug!("Dash started facing {:?}", self.facing);
        }
    }

    fn resolve_horizontal(&mut self, tuning: &LocomotionTuning, axis: Vec2) {
        if self.is_wall_jumping() {
            return;
        }

        self.move_direction.x = axis.x;
        if axis.x != 0.0 {
            self.facing = Facing::from_sign(axis.x);
        }

        if self.is_dashing() {
            self.move_direction.x = self.facing.sign() * tuning.dash_speed;
            self.move_direction.y = 0.0;
        } else if self.posture.is_crouched() && axis.x != 0.0 {
            self.move_direction.x *= tuning.creep_speed;
        } else {
            self.move_direction.x *= tuning.walk_speed;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn on_ground<H: HeadroomProbe>(
        &mut self,
        tuning: &LocomotionTuning,
        abilities: &AbilityToggles,
        input: &TickInput,
        contact: &EnvironmentContact,
        body: &mut CharacterBody,
        headroom: &H,
        axis: Vec2,
        clock: SimClock,
        out: &mut TickOutput,
    ) {
        self.move_direction.y = 0.0;
        self.clear_air_abilities(tuning);

        if input.jump_pressed {
            self.launch(tuning, abilities, contact, clock);
            out.suspend_ground_check = true;
        }

        out.posture_shift += self.crouch_and_creep(body, headroom, axis, clock.dt);

        self.vertical_mode = if self.is_dashing() {
            VerticalMode::Dashing
        } else {
            VerticalMode::Normal
        };
    }

    fn clear_air_abilities(&mut self, tuning: &LocomotionTuning) {
        self.jump_phase = JumpPhase::Grounded;
        self.wall_jump.cancel();
        self.ground_slamming = false;
        self.current_glide_time = tuning.glide_time;
        self.start_glide = true;
    }

    fn launch(
        &mut self,
        tuning: &LocomotionTuning,
        abilities: &AbilityToggles,
        contact: &EnvironmentContact,
        clock: SimClock,
    ) {
        let charged = abilities.can_power_jump
            && self.posture.is_crouched()
            && contact.ground_type != GroundType::OneWayPlatform
            && self.power_jump_timer > tuning.power_jump_wait_time;

        if charged {
            self.move_direction.y = tuning.power_jump_speed;
            self.power_jump.open(clock.now, tuning.power_jump_time);
            debug!("Power jump after {:.2}s crouch", self.power_jump_timer);
        } else {
            self.move_direction.y = tuning.jump_speed;
            debug!("Jump");
        }

        self.jump_phase = JumpPhase::Jumped;
        self.able_to_wall_run = true;
    }

    /// Returns the vertical shift that keeps the feet planted across a posture change.
    fn crouch_and_creep<H: HeadroomProbe>(
        &mut self,
        body: &mut CharacterBody,
        headroom: &H,
        axis: Vec2,
        dt: f32,
    ) -> f32 {
        let mut shift = 0.0;

        if axis.y < 0.0 {
            if self.posture == Posture::Standing {
                shift += body.shrink_to_crouch();
                self.posture = Posture::Crouching;
            }
            self.power_jump_timer += dt;
        } else {
            if self.posture.is_crouched() && !headroom.headroom_blocked(body, body.standing_clearance()) {
                shift += self.stand_up(body);
            }
            self.power_jump_timer = 0.0;
        }

        if self.posture.is_crouched() {
            self.posture = if self.move_direction.x != 0.0 {
                Posture::Creeping
            } else {
                Posture::Crouching
            };
        }

        shift
    }

    fn stand_up(&mut self, body: &mut CharacterBody) -> f32 {
        self.posture = Posture::Standing;
        self.crouch_clear.cancel();
        body.restore_standing()
    }

    fn in_air(
        &mut self,
        tuning: &LocomotionTuning,
        abilities: &AbilityToggles,
        input: &TickInput,
        contact: &EnvironmentContact,
        axis: Vec2,
        clock: SimClock,
    ) {
        // Crouching and air jumps are exclusive: stand up shortly after leaving the ground
        if self.posture.is_crouched() && self.move_direction.y > 0.0 && !self.crouch_clear.is_active() {
            self.crouch_clear.open(clock.now, tuning.crouch_clear_delay);
        }
        self.power_jump_timer = 0.0;

        self.air_jump(tuning, abilities, input, contact, clock);
        self.wall_running(tuning, abilities, contact, axis, clock);
        self.resolve_vertical(tuning, abilities, contact, axis, clock.dt);
    }

    fn air_jump(
        &mut self,
        tuning: &LocomotionTuning,
        abilities: &AbilityToggles,
        input: &TickInput,
        contact: &EnvironmentContact,
        clock: SimClock,
    ) {
        if input.jump_released && self.move_direction.y > 0.0 {
            self.move_direction.y *= 0.5;
        }

        if !input.jump_pressed {
            return;
        }

        let wall = contact.wall_side();

        if abilities.can_triple_jump && wall == WallSide::None && self.jump_phase == JumpPhase::DoubleJumped {
            self.move_direction.y = tuning.extra_jump_speed;
            self.jump_phase = JumpPhase::TripleJumped;
            debug!("Triple jump");
        } else if abilities.can_double_jump && wall == WallSide::None && self.jump_phase == JumpPhase::Jumped {
            self.move_direction.y = tuning.extra_jump_speed;
            self.jump_phase = JumpPhase::DoubleJumped;
            debug!("Double jump");
        } else if abilities.can_wall_jump && wall != WallSide::None {
            let away = wall.away_sign();
            self.move_direction.x = away * tuning.x_wall_jump_speed;
            self.move_direction.y = tuning.y_wall_jump_speed;
            self.facing = Facing::from_sign(away);
            self.wall_jump.open(clock.now, tuning.wall_jump_time);

            if abilities.can_jump_after_wall_jump || self.jump_phase == JumpPhase::Grounded {
                self.jump_phase = JumpPhase::Jumped;
            }
            debug!("Wall jump off {:?} wall", wall);
        }
    }

    fn wall_running(
        &mut self,
        tuning: &LocomotionTuning,
        abilities: &AbilityToggles,
        contact: &EnvironmentContact,
        axis: Vec2,
        clock: SimClock,
    ) {
        let wall = contact.wall_side();

        if abilities.can_wall_run && wall != WallSide::None {
            if axis.y > 0.0 && self.able_to_wall_run {
                self.move_direction.y = tuning.wall_run_amount;
                self.facing = Facing::from_sign(wall.away_sign());

                if !self.wall_run.is_active() {
                    self.wall_run.open(clock.now, tuning.wall_run_time);
                    debug!("Wall run on {:?} wall", wall);
                }
            }
        } else if wall == WallSide::None && abilities.can_multiple_wall_run {
            self.wall_run.cancel();
            self.able_to_wall_run = true;
        }

        if wall != WallSide::None {
            self.current_glide_time = if abilities.can_glide_after_wall_contact {
                tuning.glide_time
            } else {
                0.0
            };
        }
    }

    /// Priority-ordered vertical velocity rule; exactly one mode applies per tick.
    fn resolve_vertical(
        &mut self,
        tuning: &LocomotionTuning,
        abilities: &AbilityToggles,
        contact: &EnvironmentContact,
        axis: Vec2,
        dt: f32,
    ) {
        let velocity = &mut self.move_direction.y;

        if *velocity > 0.0 && contact.above {
            *velocity = 0.0;
        }

        self.vertical_mode = if abilities.can_wall_slide && contact.wall_contact() {
            if contact.hit_wall_this_frame {
                *velocity = 0.0;
            }
            if *velocity <= 0.0 {
                *velocity -= tuning.gravity * tuning.wall_slide_amount * dt;
            } else {
                *velocity -= tuning.gravity * dt;
            }
            VerticalMode::WallSliding
        } else if abilities.can_glide && axis.y > 0.0 && *velocity < tuning.glide_entry_threshold {
            if self.current_glide_time > 0.0 {
                if self.start_glide {
                    *velocity = 0.0;
                    self.start_glide = false;
                }
                *velocity -= tuning.glide_descent_amount * dt;
                self.current_glide_time = (self.current_glide_time - dt).max(0.0);
                VerticalMode::Gliding
            } else {
                *velocity -= tuning.gravity * dt;
                VerticalMode::Normal
            }
        } else if self.ground_slamming && !self.power_jump.is_active() && *velocity < 0.0 {
            *velocity = -tuning.ground_slam_speed;
            VerticalMode::GroundSlamming
        } else if self.dash.is_active() {
            VerticalMode::Dashing
        } else {
            *velocity -= tuning.gravity * dt;
            VerticalMode::Normal
        };
    }
}

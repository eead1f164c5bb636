//! Sensing domain: kinematic integration and contact classification.

use avian2d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sensing::layers::{ground_mask, obstruction_mask};
use crate::sensing::{
    CastHeadroom, CharacterBody, EnvironmentContact, GroundEffectorQuery, GroundType, PreviousContact,
    ProbeShape, ShapeCaster, is_walkable, signed_slope_angle,
};
use crate::timing::TimedWindow;

/// Collide-and-slide iterations per step
const MAX_SLIDES: usize = 3;

/// Tunables for environment sensing
#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct SensorTuning {
    /// Cast length for contact probes
    pub probe_distance: f32,
    /// Steepest slope (degrees) still treated as ground
    pub slope_angle_limit: f32,
    /// Extra downward push when walking down a slope
    pub down_force_adjustment: f32,
    /// Lateral probe box size relative to the collider
    pub lateral_probe_scale: f32,
    /// Seconds ground detection stays off after a suspension request
    pub ground_check_cooldown: f32,
    /// Gap kept between the collider and anything it slides against
    pub skin_width: f32,
}

impl Default for SensorTuning {
    fn default() -> Self {
        Self {
            probe_distance: 0.2,
            slope_angle_limit: 45.0,
            down_force_adjustment: 1.2,
            lateral_probe_scale: 0.6,
            ground_check_cooldown: 0.1,
            skin_width: 0.02,
        }
    }
}

/// Displacement queued by locomotion, applied on the next sensor step
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct PendingDisplacement {
    /// Movement swept through the world with collide-and-slide
    pub motion: Vec2,
    /// Posture correction applied directly, without a sweep
    pub offset: Vec2,
}

impl PendingDisplacement {
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl From<Vec2> for PendingDisplacement {
    fn from(motion: Vec2) -> Self {
        Self {
            motion,
            offset: Vec2::ZERO,
        }
    }
}

/// Moves a character and probes its surroundings once per fixed step.
#[derive(Component, Debug, Clone)]
pub struct EnvironmentSensor {
    pub tuning: SensorTuning,
    /// Layers probed for ground and hit when moving down
    pub collision_mask: LayerMask,
    /// Layers that block from the side and from below
    pub obstruction_mask: LayerMask,
    contact: EnvironmentContact,
    previous: PreviousContact,
    ground_check_resume: TimedWindow,
}

impl Default for EnvironmentSensor {
    fn default() -> Self {
        Self::new(SensorTuning::default())
    }
}

impl EnvironmentSensor {
    pub fn new(tuning: SensorTuning) -> Self {
        Self {
            tuning,
            collision_mask: ground_mask(),
            obstruction_mask: obstruction_mask(),
            contact: EnvironmentContact::default(),
            previous: PreviousContact::default(),
            ground_check_resume: TimedWindow::default(),
        }
    }

    pub fn with_masks(mut self, collision_mask: LayerMask, obstruction_mask: LayerMask) -> Self {
        self.collision_mask = collision_mask;
        self.obstruction_mask = obstruction_mask;
        self
    }

    pub fn contact(&self) -> &EnvironmentContact {
        &self.contact
    }

    pub fn is_ground_check_suspended(&self) -> bool {
        self.ground_check_resume.is_active()
    }

    /// Stop detecting ground for the cooldown window, starting now.
    ///
    /// Used right after a jump launches so the ground just left is not
    /// picked up again on the next step.
    pub fn suspend_ground_check(&mut self, now: f64) {
        self.contact.below = false;
        self.ground_check_resume
            .open(now, self.tuning.ground_check_cooldown);
        debug!(
            "Ground check suspended for {:.2}s",
            self.tuning.ground_check_cooldown
        );
    }

    /// Apply the pending displacement to `position`, then re-sense.
    ///
    /// The offset is applied without a sweep. It keeps the feet planted
    /// across a posture change, where the resized body starts out
    /// overlapping the floor or ceiling it is being moved away from.
    pub fn advance<C, G>(
        &mut self,
        position: &mut Vec2,
        body: &CharacterBody,
        pending: impl Into<PendingDisplacement>,
        now: f64,
        caster: &C,
        effectors: &G,
    ) -> EnvironmentContact
    where
        C: ShapeCaster,
        G: GroundEffectorQuery,
    {
        if self.ground_check_resume.expire(now) {
            debug!("Ground check resumed");
        }

        self.previous = PreviousContact::from(&self.contact);

        let pending = pending.into();
        *position += pending.offset;

        let motion = self.follow_slope(pending.motion);
        *position = self.slide(*position, body, motion, caster);

        let mut contact = EnvironmentContact {
            slope_angle: self.contact.slope_angle,
            ..default()
        };

        if !self.is_ground_check_suspended() {
            self.check_ground(&mut contact, *position, body, caster, effectors);
        }
        self.check_other_collisions(&mut contact, *position, body, caster);

        contact.hit_ground_this_frame = self.previous.landed(contact.below);
        contact.hit_wall_this_frame = self.previous.hit_wall(contact.left, contact.right);

        if contact.hit_ground_this_frame {
            debug!(
                "Landed: ground={:?}, slope={:.1}",
                contact.ground_type, contact.slope_angle
            );
        }

        self.contact = contact;
        contact
    }

    /// Headroom probe for this sensor's character standing at `center`.
    pub fn headroom<'a, C: ShapeCaster>(&self, caster: &'a C, center: Vec2) -> CastHeadroom<'a, C> {
        CastHeadroom {
            caster,
            center,
            mask: self.obstruction_mask,
        }
    }

    /// Push the displacement down onto a descending slope so the character
    /// does not skip off it.
    pub(crate) fn follow_slope(&self, pending: Vec2) -> Vec2 {
        let slope = self.contact.slope_angle;
        if !self.contact.below || slope == 0.0 {
            return pending;
        }

        let downhill = (pending.x > 0.0 && slope > 0.0) || (pending.x < 0.0 && slope < 0.0);
        if !downhill {
            return pending;
        }

        let drop = (slope.to_radians().tan() * pending.x).abs() * self.tuning.down_force_adjustment;
        Vec2::new(pending.x, pending.y - drop)
    }

    /// Move by `displacement`, stopping short of obstacles and sliding along them.
    fn slide<C: ShapeCaster>(
        &self,
        mut position: Vec2,
        body: &CharacterBody,
        displacement: Vec2,
        caster: &C,
    ) -> Vec2 {
        let shape = body.probe_shape();
        let skin = self.tuning.skin_width;
        let mut remaining = displacement;

        for _ in 0..MAX_SLIDES {
            let Ok(direction) = Dir2::new(remaining) else {
                break;
            };
            let distance = remaining.length();
            let mask = if remaining.y < 0.0 {
                self.collision_mask
            } else {
                self.obstruction_mask
            };

            let Some(hit) = caster.cast(shape, position, direction, distance + skin, mask) else {
                position += remaining;
                break;
            };

            let travel = (hit.distance - skin).clamp(0.0, distance);
            position += direction * travel;

            let rest = remaining - direction * travel;
            remaining = rest - hit.normal * rest.dot(hit.normal);
        }

        position
    }

    fn check_ground<C, G>(
        &self,
        contact: &mut EnvironmentContact,
        position: Vec2,
        body: &CharacterBody,
        caster: &C,
        effectors: &G,
    ) where
        C: ShapeCaster,
        G: GroundEffectorQuery,
    {
        let hit = caster.cast(
            body.probe_shape(),
            position,
            Dir2::NEG_Y,
            self.tuning.probe_distance,
            self.collision_mask,
        );

        match hit {
            Some(hit) => {
                contact.ground_type = effectors
                    .ground_type(hit.surface)
                    .unwrap_or(GroundType::LevelGeometry);
                contact.slope_angle = signed_slope_angle(hit.normal);
                contact.below = is_walkable(contact.slope_angle, self.tuning.slope_angle_limit);
            }
            None => {
                contact.ground_type = GroundType::None;
                contact.slope_angle = 0.0;
                contact.below = false;
            }
        }
    }

    fn check_other_collisions<C: ShapeCaster>(
        &self,
        contact: &mut EnvironmentContact,
        position: Vec2,
        body: &CharacterBody,
        caster: &C,
    ) {
        let probe = self.tuning.probe_distance;
        let lateral = ProbeShape::Box(body.size() * self.tuning.lateral_probe_scale);

        contact.left = caster
            .cast(lateral, position, Dir2::NEG_X, probe * 2.0, self.obstruction_mask)
            .is_some();
        contact.right = caster
            .cast(lateral, position, Dir2::X, probe * 2.0, self.obstruction_mask)
            .is_some();
        contact.above = caster
            .cast(body.probe_shape(), position, Dir2::Y, probe, self.obstruction_mask)
            .is_some();
    }
}

//! Sensing domain: the per-tick contact snapshot read by locomotion.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Classification of the surface under the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, Reflect)]
pub enum GroundType {
    /// Not touching any ground
    #[default]
    None,
    /// Regular terrain, the default for surfaces without an effector
    LevelGeometry,
    /// Platforms that can be jumped through from below
    OneWayPlatform,
    /// Game-specific surfaces (ice, conveyors, ...)
    Custom(u16),
}

/// Which side a wall touches the character on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallSide {
    #[default]
    None,
    Left,
    Right,
}

impl WallSide {
    /// Horizontal direction pointing away from the wall
    pub fn away_sign(self) -> f32 {
        match self {
            WallSide::Left => 1.0,
            WallSide::Right => -1.0,
            WallSide::None => 0.0,
        }
    }
}

/// Snapshot of what the character touches, rebuilt every fixed step.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct EnvironmentContact {
    pub below: bool,
    pub left: bool,
    pub right: bool,
    pub above: bool,
    pub ground_type: GroundType,
    /// Signed angle in degrees between the ground normal and world up
    pub slope_angle: f32,
    pub hit_ground_this_frame: bool,
    pub hit_wall_this_frame: bool,
}

impl EnvironmentContact {
    pub fn wall_contact(&self) -> bool {
        self.left || self.right
    }

    /// Left wins when both sides touch.
    pub fn wall_side(&self) -> WallSide {
        if self.left {
            WallSide::Left
        } else if self.right {
            WallSide::Right
        } else {
            WallSide::None
        }
    }
}

/// Contact bits remembered from the previous tick for edge detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct PreviousContact {
    pub below: bool,
    pub left: bool,
    pub right: bool,
}

impl From<&EnvironmentContact> for PreviousContact {
    fn from(contact: &EnvironmentContact) -> Self {
        Self {
            below: contact.below,
            left: contact.left,
            right: contact.right,
        }
    }
}

impl PreviousContact {
    /// Grounded now, airborne last tick.
    pub fn landed(&self, below: bool) -> bool {
        below && !self.below
    }

    /// Touching a wall now, touching neither side last tick.
    pub fn hit_wall(&self, left: bool, right: bool) -> bool {
        (left || right) && !self.left && !self.right
    }
}

/// Signed angle in degrees from a surface normal to world up.
///
/// Positive when the surface descends to the right.
pub fn signed_slope_angle(normal: Vec2) -> f32 {
    normal.angle_to(Vec2::Y).to_degrees()
}

pub fn is_walkable(slope_angle: f32, slope_angle_limit: f32) -> bool {
    slope_angle.abs() <= slope_angle_limit
}

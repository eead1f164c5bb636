//! Sensing domain: the character's collider description.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::sensing::ProbeShape;

/// Setup-time failure of a character's sensing configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    /// Collider sizes must be finite and positive
    InvalidColliderSize { size: Vec2 },
    /// An entity has a sensor but nothing to sense with
    MissingBody { entity: Entity },
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::InvalidColliderSize { size } => {
                write!(f, "Invalid character collider size {}", size)
            }
            SetupError::MissingBody { entity } => {
                write!(f, "Entity {} has an EnvironmentSensor but no CharacterBody", entity)
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Capsule collider of a character, standing or crouched.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterBody {
    size: Vec2,
    standing_size: Vec2,
}

impl CharacterBody {
    pub fn new(size: Vec2) -> Result<Self, SetupError> {
        if !size.is_finite() || size.x <= 0.0 || size.y <= 0.0 {
            return Err(SetupError::InvalidColliderSize { size });
        }
        Ok(Self {
            size,
            standing_size: size,
        })
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn standing_size(&self) -> Vec2 {
        self.standing_size
    }

    pub fn is_crouched(&self) -> bool {
        self.size.y < self.standing_size.y
    }

    pub fn probe_shape(&self) -> ProbeShape {
        ProbeShape::Capsule(self.size)
    }

    pub fn collider(&self) -> Collider {
        self.probe_shape().to_collider()
    }

    /// Halve the collider height. Returns the vertical shift that keeps the feet in place.
    pub fn shrink_to_crouch(&mut self) -> f32 {
        self.size.y = self.standing_size.y * 0.5;
        -self.standing_size.y * 0.25
    }

    /// Restore the standing collider. Returns the vertical shift that keeps the feet in place.
    pub fn restore_standing(&mut self) -> f32 {
        self.size = self.standing_size;
        self.standing_size.y * 0.25
    }

    /// Upward distance that must be free before standing back up.
    pub fn standing_clearance(&self) -> f32 {
        self.standing_size.y * 0.5
    }
}

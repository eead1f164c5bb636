//! Sensing domain: the narrow boundary through which the world is probed.
//!
//! The sensor and the locomotion state machine never touch the physics
//! engine directly. They cast shapes through [`ShapeCaster`], classify
//! surfaces through [`GroundEffectorQuery`] and check for overhead room
//! through [`HeadroomProbe`], so both can run against synthetic worlds.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::sensing::{CharacterBody, GroundType};

/// Shapes the sensor casts, sized in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeShape {
    /// Vertical capsule fitting the given bounding size
    Capsule(Vec2),
    /// Axis-aligned box
    Box(Vec2),
}

impl ProbeShape {
    pub fn size(self) -> Vec2 {
        match self {
            ProbeShape::Capsule(size) | ProbeShape::Box(size) => size,
        }
    }

    pub fn half_extents(self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn to_collider(self) -> Collider {
        match self {
            ProbeShape::Capsule(size) => {
                let radius = size.x * 0.5;
                Collider::capsule(radius, (size.y - size.x).max(0.0))
            }
            ProbeShape::Box(size) => Collider::rectangle(size.x, size.y),
        }
    }
}

/// First surface hit by a cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub point: Vec2,
    /// Outward normal of the hit surface
    pub normal: Vec2,
    /// Distance travelled before impact
    pub distance: f32,
    pub surface: Entity,
}

/// Sweeps a shape through the world and reports the first hit.
pub trait ShapeCaster {
    fn cast(
        &self,
        shape: ProbeShape,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit>;
}

/// Looks up the ground-type override attached to a surface, if any.
pub trait GroundEffectorQuery {
    fn ground_type(&self, surface: Entity) -> Option<GroundType>;
}

/// Answers whether restoring the standing collider would hit something.
pub trait HeadroomProbe {
    fn headroom_blocked(&self, body: &CharacterBody, clearance: f32) -> bool;
}

/// Headroom check backed by a shape caster at a fixed position.
pub struct CastHeadroom<'a, C> {
    pub caster: &'a C,
    pub center: Vec2,
    pub mask: LayerMask,
}

impl<C: ShapeCaster> HeadroomProbe for CastHeadroom<'_, C> {
    fn headroom_blocked(&self, body: &CharacterBody, clearance: f32) -> bool {
        self.caster
            .cast(body.probe_shape(), self.center, Dir2::Y, clearance, self.mask)
            .is_some()
    }
}

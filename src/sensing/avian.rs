//! Sensing domain: avian2d-backed implementations of the probe boundary.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::sensing::{GroundEffectorQuery, GroundType, ProbeShape, ShapeCaster, SurfaceHit};

/// Overrides the ground classification of the collider it is attached to
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct GroundEffector {
    pub ground_type: GroundType,
}

impl GroundEffector {
    pub fn one_way_platform() -> Self {
        Self {
            ground_type: GroundType::OneWayPlatform,
        }
    }
}

/// Shape caster over avian's spatial query, ignoring the casting character.
pub struct SpatialCaster<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    exclude: Entity,
}

impl<'a, 'w, 's> SpatialCaster<'a, 'w, 's> {
    pub fn new(spatial_query: &'a SpatialQuery<'w, 's>, exclude: Entity) -> Self {
        Self {
            spatial_query,
            exclude,
        }
    }
}

impl ShapeCaster for SpatialCaster<'_, '_, '_> {
    fn cast(
        &self,
        shape: ProbeShape,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SurfaceHit> {
        let collider = shape.to_collider();
        let config = ShapeCastConfig::from_max_distance(max_distance);
        let filter = SpatialQueryFilter::from_mask(mask).with_excluded_entities([self.exclude]);

        self.spatial_query
            .cast_shape(&collider, origin, 0.0, direction, &config, &filter)
            .map(|hit| SurfaceHit {
                point: hit.point1,
                normal: hit.normal1,
                distance: hit.distance,
                surface: hit.entity,
            })
    }
}

impl<'w, 's> GroundEffectorQuery for Query<'w, 's, &GroundEffector> {
    fn ground_type(&self, surface: Entity) -> Option<GroundType> {
        self.get(surface).ok().map(|effector| effector.ground_type)
    }
}

//! Platformer locomotion core: environment sensing plus an ability state
//! machine, wired into bevy's fixed-step schedule.

pub mod content;
pub mod movement;
pub mod sensing;
pub mod timing;

use bevy::prelude::*;

/// Fixed-step ordering: sensors integrate and re-sense before locomotion decides.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    Sense,
    Decide,
}

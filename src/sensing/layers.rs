//! Sensing domain: physics layers used for collision filtering.

use avian2d::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, slopes)
    Ground,
    /// Wall surfaces
    Wall,
    /// One-way platforms - solid only when landed on from above
    Platform,
    /// Player character
    Player,
}

/// Everything the character can stand on, one-way platforms included.
pub fn ground_mask() -> LayerMask {
    LayerMask::from([GameLayer::Ground, GameLayer::Wall, GameLayer::Platform])
}

/// Everything that blocks the character from the side or from below.
pub fn obstruction_mask() -> LayerMask {
    LayerMask::from([GameLayer::Ground, GameLayer::Wall])
}

/// Collision layers for a player-controlled character.
pub fn player_layers() -> CollisionLayers {
    CollisionLayers::new(
        GameLayer::Player,
        [GameLayer::Ground, GameLayer::Wall, GameLayer::Platform],
    )
}

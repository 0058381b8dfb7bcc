use super::grid::Cell;
use super::snake::CollisionType;

/// An RGB color hint for effects drawn by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GOLD: Rgb = Rgb(255, 215, 0);
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The snake crashed; the round is over
    Collision {
        at: Cell,
        kind: CollisionType,
        color: Rgb,
    },
    /// The snake ate the food that was at `at`
    FoodEaten { at: Cell, color: Rgb },
    ScoreChanged { score: u32, high_score: u32 },
    /// A new high score could not be written; it is kept in memory only
    HighScoreSaveFailed { score: u32, reason: String },
    /// Particles and other transient effects should be dropped
    EffectsCleared,
}

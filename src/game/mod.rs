//! Core game logic module for Snake
//!
//! This module contains the simulation and its state machine without any
//! terminal or rendering dependencies. High-score persistence and sound are
//! reached only through the [`HighScoreStore`](crate::highscore::HighScoreStore)
//! and [`AudioSink`](crate::audio::AudioSink) traits.

pub mod action;
pub mod config;
pub mod controller;
pub mod event;
pub mod food;
pub mod grid;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Intent};
pub use config::{ConfigError, GameConfig};
pub use controller::{Flow, GameController};
pub use event::{GameEvent, Rgb};
pub use food::Food;
pub use grid::{Cell, Grid};
pub use snake::{CollisionType, GrowEffect, GrowOutcome, Segment, Snake, SnakeTuning};
pub use state::{GameSession, GameState};

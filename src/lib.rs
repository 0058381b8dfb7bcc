//! Ultra Snake - an arcade Snake game for the terminal
//!
//! This library provides:
//! - Core game logic and the game state machine (game module)
//! - High-score persistence (highscore module)
//! - Sound triggers (audio module)
//! - TUI rendering and particle effects (render module)
//! - Keyboard input mapping (input module)
//! - The interactive terminal loop (modes module)

pub mod audio;
pub mod game;
pub mod highscore;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

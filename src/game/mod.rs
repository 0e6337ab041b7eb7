//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The run loop owns a [`GameState`] and hands it to [`GameEngine`] once per poll.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, InputEvent, request_direction};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, StepOutcome};
pub use food::place_food;
pub use state::{Arena, Cell, GameOverReason, GamePhase, GameState, Snake};

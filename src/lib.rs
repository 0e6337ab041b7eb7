//! Term Snake - the classic Snake game in a terminal
//!
//! This library provides:
//! - Core game logic: state, fixed-step simulation and food placement (game module)
//! - Keyboard input mapping (input module)
//! - TUI rendering (render module)
//! - The interactive run loop (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;

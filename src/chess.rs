//! Implementation of the chess rules: board model, piece movement, move
//! validation and execution, and game state tracking.

pub mod board;
pub mod core;
pub mod error;
pub mod game;
pub mod moves;
pub mod player;
pub mod rules;
pub mod snapshot;

pub use error::{Error, Result};

//! Participants of the game. The rules engine only cares about the color a
//! player commands; the controller decides who picks the moves.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::chess::core::Color;
use crate::chess::game::Game;
use crate::chess::moves::Move;

/// Who provides the moves for a side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    /// Moves are read from the input.
    #[default]
    Human,
    /// Moves are picked by [`ComputerPlayer`].
    Computer,
}

/// Identity of one side of the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub color: Color,
    #[allow(missing_docs)]
    pub controller: Controller,
}

impl Player {
    /// Creates a player with a default name derived from the color.
    #[must_use]
    pub fn new(color: Color, controller: Controller) -> Self {
        Self {
            name: color.name().to_string(),
            color,
            controller,
        }
    }
}

/// Plays uniformly random legal moves. This is not a search engine: it is
/// only useful as a sparring partner and for exercising the rules.
#[derive(Debug)]
pub struct ComputerPlayer {
    rng: StdRng,
}

impl ComputerPlayer {
    /// Seeding makes the sequence of picked moves reproducible.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
        }
    }

    /// Picks a legal move for the side to move or `None` if the game is over
    /// because there are none.
    pub fn choose(&mut self, game: &Game) -> Option<Move> {
        let moves = game.legal_moves();
        let picked = moves.choose(&mut self.rng).copied();
        if let Some(mv) = picked {
            tracing::debug!(candidates = moves.len(), %mv, "computer picked a move");
        }
        picked
    }
}

//! Persistence of games. A snapshot stores the starting position, the players
//! and the moves; loading replays the moves through [`Game::add_move`], so a
//! restored game carries the same history, castling and en passant state as
//! the original. The final placement and turn are stored as well and checked
//! after the replay.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use crate::chess::core::Color;
use crate::chess::game::Game;
use crate::chess::moves::{Move, MoveKind};
use crate::chess::player::Player;

/// A move as entered by a player: two squares and the promotion selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
    #[allow(missing_docs)]
    pub from: String,
    #[allow(missing_docs)]
    pub to: String,
    /// One of "qrbn" for promotions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<char>,
}

impl From<&Move> for MoveEntry {
    fn from(mv: &Move) -> Self {
        let promotion = match mv.kind() {
            MoveKind::Promotion(promoted) => promoted
                .notation_letter()
                .map(|letter| letter.to_ascii_lowercase()),
            _ => None,
        };
        Self {
            from: mv.from().to_string(),
            to: mv.to().to_string(),
            promotion,
        }
    }
}

/// Serializable form of a [`Game`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Fingerprint of the starting position (a valid FEN prefix).
    pub initial: String,
    #[allow(missing_docs)]
    pub white: Player,
    #[allow(missing_docs)]
    pub black: Player,
    /// Executed moves, oldest first.
    pub moves: Vec<MoveEntry>,
    /// Piece placement after the last move.
    pub placement: String,
    /// Side to move after the last move.
    pub turn: Color,
}

impl Snapshot {
    /// # Errors
    ///
    /// Fails if serialization fails.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize game")
    }

    /// # Errors
    ///
    /// Fails if the input is not a serialized snapshot.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("failed to parse saved game")
    }
}

impl Game {
    /// Captures everything needed to restore the game.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            initial: self.initial_fingerprint().to_string(),
            white: self.player(Color::White).clone(),
            black: self.player(Color::Black).clone(),
            moves: self
                .history()
                .iter()
                .map(|record| MoveEntry::from(record.mv()))
                .collect(),
            placement: self.board().placement(),
            turn: self.side_to_move(),
        }
    }

    /// Restores the game by replaying the stored moves from the starting
    /// position.
    ///
    /// # Errors
    ///
    /// Fails if the starting position is malformed, the players' colors are
    /// swapped, any move is rejected during the replay, or the replay ends in
    /// a position different from the stored one.
    pub fn from_snapshot(snapshot: &Snapshot) -> anyhow::Result<Self> {
        ensure!(
            snapshot.white.color == Color::White && snapshot.black.color == Color::Black,
            "players should command white and black, got {} and {}",
            snapshot.white.color.name(),
            snapshot.black.color.name()
        );
        let mut game = Self::from_fen(&snapshot.initial)
            .context("saved game has malformed starting position")?
            .with_players(snapshot.white.clone(), snapshot.black.clone());
        for (index, entry) in snapshot.moves.iter().enumerate() {
            game.play(&entry.from, &entry.to, entry.promotion)
                .with_context(|| {
                    format!(
                        "saved move #{} {}{} can not be replayed",
                        index + 1,
                        entry.from,
                        entry.to
                    )
                })?;
        }
        ensure!(
            game.board().placement() == snapshot.placement,
            "replayed position {} does not match saved position {}",
            game.board().placement(),
            snapshot.placement
        );
        ensure!(
            game.side_to_move() == snapshot.turn,
            "replayed game has {} to move, saved game has {}",
            game.side_to_move().name(),
            snapshot.turn.name()
        );
        Ok(game)
    }
}

/// Writes the game to `path` as JSON.
///
/// # Errors
///
/// Fails if the file can not be written.
pub fn save(game: &Game, path: &Path) -> anyhow::Result<()> {
    let json = game.snapshot().to_json()?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Reads a game saved by [`save`].
///
/// # Errors
///
/// Fails if the file can not be read or does not hold a valid game.
pub fn load(path: &Path) -> anyhow::Result<Game> {
    let json =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Game::from_snapshot(&Snapshot::from_json(&json)?)
}

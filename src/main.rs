//! Plays a game of chess on the terminal. Moves are read from stdin one per
//! line, the board and engine responses are written to stdout and logs go to
//! stderr (see `RUST_LOG`).

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use chessrules::chess::core::Color;
use chessrules::chess::game::Game;
use chessrules::chess::player::{ComputerPlayer, Controller, Player};
use chessrules::chess::snapshot;
use chessrules::interface::Session;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Chess rules engine with a line-oriented interface.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// Who plays White.
    #[arg(long, value_enum, default_value_t = Controller::Human)]
    white: Controller,
    /// Who plays Black.
    #[arg(long, value_enum, default_value_t = Controller::Human)]
    black: Controller,
    /// Resume a game saved with the `save` command.
    #[arg(long, conflicts_with = "fen")]
    load: Option<PathBuf>,
    /// Start from a custom position in Forsyth-Edwards Notation.
    #[arg(long)]
    fen: Option<String>,
    /// Seed for the computer player's move choice.
    #[arg(long)]
    seed: Option<u64>,
}

impl Config {
    fn game(&self) -> anyhow::Result<Game> {
        if let Some(path) = &self.load {
            // Saved games carry their own players.
            return snapshot::load(path);
        }
        let game = match &self.fen {
            Some(fen) => Game::from_fen(fen).with_context(|| format!("invalid position: {fen}"))?,
            None => Game::new(),
        };
        Ok(game.with_players(
            Player::new(Color::White, self.white),
            Player::new(Color::Black, self.black),
        ))
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    tracing::debug!(?config, "starting");

    chessrules::print_engine_info();
    chessrules::print_binary_info();

    let game = config.game()?;
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Session::new(game, ComputerPlayer::new(config.seed), &mut input, &mut output).run()
}

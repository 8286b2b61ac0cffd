//! Line-oriented session that drives a [`Game`] over any text stream: the
//! binary connects it to stdin/stdout, tests connect it to in-memory buffers.
//!
//! Every input line is one command (see `help`). Moves are entered as two
//! squares (`e2 e4`, `e2e4`) with an optional promotion selector (`e7 e8 n`).
//! Rejected input is reported as `error: <reason>` and the session carries on.

use std::io::{BufRead, Write};

use anyhow::Context;
use itertools::Itertools;

use crate::chess::core::Color;
use crate::chess::game::{Game, Status};
use crate::chess::player::{ComputerPlayer, Controller};
use crate::chess::snapshot;

use self::command::Command;

mod command;

const HELP: &str = "\
commands:
  <from> <to> [q|r|b|n]  make a move, e.g. `e2 e4` or `e7e8q`
  board                  show the board
  moves                  list legal moves
  history                show the moves played so far
  status                 show the game status
  save <path>            write the game to a file
  load <path>            resume a game from a file
  new                    start a new game with the same players
  help                   show this message
  quit                   leave the session";

/// Connects a game, the computer player and I/O.
pub struct Session<'a, R: BufRead, W: Write> {
    game: Game,
    computer: ComputerPlayer,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    #[must_use]
    pub fn new(game: Game, computer: ComputerPlayer, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game,
            computer,
            input,
            output,
        }
    }

    /// The game in its current state.
    #[must_use]
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Reads and executes commands until `quit` or the end of input.
    ///
    /// # Errors
    ///
    /// Fails only on I/O errors. Illegal moves, malformed commands and
    /// unreadable save files are reported on the output instead.
    pub fn run(&mut self) -> anyhow::Result<()> {
        write!(self.output, "{}", self.game.board())?;
        self.computer_replies()?;
        loop {
            let mut line = String::new();
            if self
                .input
                .read_line(&mut line)
                .context("failed to read command")?
                == 0
            {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Command::Move {
                    from,
                    to,
                    promotion,
                } => self.handle_move(&from, &to, promotion)?,
                Command::Board => write!(self.output, "{}", self.game.board())?,
                Command::Moves => {
                    writeln!(self.output, "{}", self.game.legal_moves().iter().join(" "))?;
                },
                Command::History => self.handle_history()?,
                Command::Status => writeln!(
                    self.output,
                    "{}; {} to move",
                    self.game.status(),
                    self.game.side_to_move().name()
                )?,
                Command::Save(path) => match snapshot::save(&self.game, &path) {
                    Ok(()) => writeln!(self.output, "saved game to {}", path.display())?,
                    Err(e) => writeln!(self.output, "error: {e:#}")?,
                },
                Command::Load(path) => match snapshot::load(&path) {
                    Ok(game) => {
                        self.game = game;
                        writeln!(self.output, "loaded game from {}", path.display())?;
                        self.show_position()?;
                        self.computer_replies()?;
                    },
                    Err(e) => writeln!(self.output, "error: {e:#}")?,
                },
                Command::NewGame => {
                    let white = self.game.player(Color::White).clone();
                    let black = self.game.player(Color::Black).clone();
                    self.game = Game::new().with_players(white, black);
                    write!(self.output, "{}", self.game.board())?;
                    self.computer_replies()?;
                },
                Command::Help => writeln!(self.output, "{HELP}")?,
                Command::Quit => break,
                Command::Unknown(command) => {
                    writeln!(self.output, "error: unknown command: {command}")?;
                },
            }
        }
        Ok(())
    }

    fn handle_move(&mut self, from: &str, to: &str, promotion: Option<char>) -> anyhow::Result<()> {
        let side = self.game.side_to_move();
        if self.game.player(side).controller == Controller::Computer {
            writeln!(
                self.output,
                "error: {} is played by the computer",
                side.name()
            )?;
            return Ok(());
        }
        match self.game.play(from, to, promotion) {
            Ok(()) => {
                self.show_last_move()?;
                self.computer_replies()
            },
            Err(e) => {
                writeln!(self.output, "error: {e}")?;
                Ok(())
            },
        }
    }

    fn handle_history(&mut self) -> anyhow::Result<()> {
        if self.game.history().is_empty() {
            writeln!(self.output, "no moves yet")?;
        } else {
            writeln!(self.output, "{}", self.game.render_history())?;
        }
        Ok(())
    }

    /// Lets the computer move for as long as it controls the side to move
    /// and the game is not over.
    fn computer_replies(&mut self) -> anyhow::Result<()> {
        while self.game.player(self.game.side_to_move()).controller == Controller::Computer
            && !self.game.status().is_terminal()
        {
            let Some(mv) = self.computer.choose(&self.game) else {
                break;
            };
            self.game.add_move(mv)?;
            self.show_last_move()?;
        }
        Ok(())
    }

    fn show_last_move(&mut self) -> anyhow::Result<()> {
        if let Some(record) = self.game.history().last() {
            let mover = record.mv().piece().owner;
            writeln!(self.output, "{}: {}", mover.name(), record.notation())?;
        }
        self.show_position()
    }

    fn show_position(&mut self) -> anyhow::Result<()> {
        write!(self.output, "{}", self.game.board())?;
        let status = self.game.status();
        if status != Status::Ongoing {
            writeln!(self.output, "{status}")?;
        }
        Ok(())
    }
}

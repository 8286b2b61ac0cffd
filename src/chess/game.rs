//! Game orchestration: turn order, self-check exclusion, move history with
//! notation, and detection of checkmate, stalemate and draws.
//!
//! Every "what if" question is answered on a copy of the board. The real board
//! is replaced only once a move has passed all checks, so a rejected move never
//! leaves a trace.

use std::fmt;
use std::iter;

use arrayvec::ArrayVec;
use itertools::Itertools;

use crate::chess::board::Board;
use crate::chess::core::{Color, PieceKind, Square};
use crate::chess::error::{Error, Result};
use crate::chess::moves::Move;
use crate::chess::player::{Controller, Player};

/// Executed move together with its notation and the fingerprint of the
/// position it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    mv: Move,
    notation: String,
    fingerprint: String,
}

impl Record {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn mv(&self) -> &Move {
        &self.mv
    }

    /// Long algebraic notation with `+` or `#` suffix.
    #[must_use]
    pub fn notation(&self) -> &str {
        &self.notation
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Condition of the game from the point of view of the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    #[allow(missing_docs)]
    Ongoing,
    /// Side to move is in check but has a way out.
    Check,
    #[allow(missing_docs)]
    Checkmate { winner: Color },
    /// Side to move is not in check and has no legal moves.
    Stalemate,
    /// Neither side has more than a king and a single minor piece.
    InsufficientMaterial,
    /// The current position occurred for the third time.
    ThreefoldRepetition,
}

impl Status {
    /// Whether the game is decided. Terminal statuses are reported, not
    /// enforced: [`Game::add_move`] keeps accepting legal moves.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing | Self::Check)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => f.write_str("ongoing"),
            Self::Check => f.write_str("check"),
            Self::Checkmate { winner } => write!(f, "checkmate, {} wins", winner.name()),
            Self::Stalemate => f.write_str("stalemate, draw"),
            Self::InsufficientMaterial => f.write_str("insufficient material, draw"),
            Self::ThreefoldRepetition => f.write_str("threefold repetition, draw"),
        }
    }
}

/// A game of chess: the board, both players and the history of executed
/// moves. The only way to change the position is [`Game::add_move`].
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    white: Player,
    black: Player,
    initial: String,
    history: Vec<Record>,
}

impl Game {
    /// Standard starting position between two human players.
    #[must_use]
    pub fn new() -> Self {
        Self::from_board(Board::starting())
    }

    /// Starts a game from an arbitrary position.
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        Self {
            initial: board.fingerprint(),
            board,
            white: Player::new(Color::White, Controller::Human),
            black: Player::new(Color::Black, Controller::Human),
            history: Vec::new(),
        }
    }

    /// Starts a game from a position in Forsyth-Edwards Notation.
    ///
    /// # Errors
    ///
    /// Propagates [`Board::from_fen`] errors.
    pub fn from_fen(fen: &str) -> anyhow::Result<Self> {
        Ok(Self::from_board(Board::from_fen(fen)?))
    }

    /// Replaces the players.
    #[must_use]
    pub fn with_players(mut self, white: Player, black: Player) -> Self {
        self.white = white;
        self.black = black;
        self
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    /// The player commanding the given color.
    #[must_use]
    pub const fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Executed moves, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Record] {
        &self.history
    }

    /// Fingerprint of the position the game started from.
    #[must_use]
    pub fn initial_fingerprint(&self) -> &str {
        &self.initial
    }

    /// Validates the move and, if it is legal, executes it: the board changes,
    /// the turn passes to the opponent and the move is appended to the
    /// history with its notation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] if the move breaks the rules of its
    /// kind, it is not the mover's turn or the move would leave the mover's
    /// king in check. The game is unchanged in that case.
    pub fn add_move(&mut self, mv: Move) -> Result<()> {
        if let Err(error) = self.commit(mv) {
            tracing::debug!(%mv, %error, "rejected move");
            return Err(error);
        }
        let status = self.status();
        if status.is_terminal() {
            tracing::info!(%status, "game reached terminal condition");
        }
        Ok(())
    }

    fn commit(&mut self, mv: Move) -> Result<()> {
        mv.validate(&self.board)?;
        let mover = mv.piece().owner;
        if mover != self.board.side_to_move() {
            return Err(Error::illegal(format!(
                "it is {}'s turn, {} can not move",
                self.board.side_to_move().name(),
                mover.name()
            )));
        }
        let Some(next) = simulate(&self.board, mv) else {
            return Err(Error::illegal(format!(
                "{} leaves own king in check",
                mv.long_notation()
            )));
        };
        let opponent = !mover;
        let suffix = if checkmate(&next, opponent) {
            "#"
        } else if next.in_check(opponent) {
            "+"
        } else {
            ""
        };
        let record = Record {
            mv,
            notation: format!("{}{suffix}", mv.long_notation()),
            fingerprint: next.fingerprint(),
        };
        tracing::trace!(notation = %record.notation, "committed move");
        self.board = next;
        self.history.push(record);
        Ok(())
    }

    /// Parses and plays the move given in algebraic notation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] for malformed squares and
    /// [`Error::IllegalMove`] if the move is rejected.
    pub fn play(&mut self, from: &str, to: &str, promotion: Option<char>) -> Result<()> {
        let mv = Move::parse(&self.board, from, to, promotion)?;
        self.add_move(mv)
    }

    /// All legal moves of the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.board, self.board.side_to_move())
    }

    /// Checks whether the current position has occurred at least twice before
    /// (the starting position counts).
    #[must_use]
    pub fn threefold_repetition(&self) -> bool {
        let Some(latest) = self.history.last() else {
            return false;
        };
        let occurrences = iter::once(self.initial.as_str())
            .chain(self.history.iter().map(Record::fingerprint))
            .filter(|&fingerprint| fingerprint == latest.fingerprint)
            .count();
        occurrences >= 3
    }

    /// Evaluates the position for the side to move. Checkmate and stalemate
    /// take precedence over the draw conditions.
    #[must_use]
    pub fn status(&self) -> Status {
        let side = self.board.side_to_move();
        let in_check = self.board.in_check(side);
        if !has_legal_move(&self.board, side) {
            if in_check {
                return Status::Checkmate { winner: !side };
            }
            return Status::Stalemate;
        }
        if insufficient_material(&self.board) {
            return Status::InsufficientMaterial;
        }
        if self.threefold_repetition() {
            return Status::ThreefoldRepetition;
        }
        if in_check {
            return Status::Check;
        }
        Status::Ongoing
    }

    /// Move history, one full move per line:
    ///
    /// ```
    /// use chessrules::chess::game::Game;
    ///
    /// let mut game = Game::new();
    /// game.play("e2", "e4", None).unwrap();
    /// game.play("e7", "e5", None).unwrap();
    /// game.play("g1", "f3", None).unwrap();
    /// assert_eq!(game.render_history(), "1. e2e4 e7e5\n2. Ng1f3");
    /// ```
    #[must_use]
    pub fn render_history(&self) -> String {
        let black_first = self
            .history
            .first()
            .is_some_and(|record| record.mv.piece().owner == Color::Black);
        black_first
            .then_some("...")
            .into_iter()
            .chain(self.history.iter().map(Record::notation))
            .chunks(2)
            .into_iter()
            .enumerate()
            .map(|(index, full_move)| format!("{}. {}", index + 1, full_move.format(" ")))
            .join("\n")
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes the move on a copy of the board and passes the turn. Returns
/// `None` if the mover's king is in check afterwards.
fn simulate(board: &Board, mv: Move) -> Option<Board> {
    let mut next = board.clone();
    mv.execute(&mut next);
    next.advance(mv);
    (!next.in_check(mv.piece().owner)).then_some(next)
}

/// Checks whether executing the (otherwise valid) move leaves the mover's own
/// king attacked.
#[must_use]
pub fn leaves_king_in_check(board: &Board, mv: Move) -> bool {
    simulate(board, mv).is_none()
}

/// Promotions are tried with every promotion piece.
fn candidates(board: &Board, from: Square, to: Square) -> ArrayVec<Move, 4> {
    let Ok(mv) = Move::new(board, from, to) else {
        return ArrayVec::new();
    };
    if !mv.is_promotion() {
        return iter::once(mv).collect();
    }
    PieceKind::PROMOTIONS
        .iter()
        .filter_map(|&promotion| Move::with_promotion(board, from, to, Some(promotion)).ok())
        .collect()
}

fn legal_moves_iter(board: &Board, color: Color) -> impl Iterator<Item = Move> + '_ {
    board
        .pieces(color)
        .into_iter()
        .cartesian_product(Square::ALL)
        .flat_map(|((from, _), to)| candidates(board, from, to))
        .filter(|mv| mv.validate(board).is_ok() && !leaves_king_in_check(board, *mv))
}

/// Every legal move of the color in board scan order of the moving pieces,
/// then of the destinations. Does not look at whose turn it is.
#[must_use]
pub fn legal_moves(board: &Board, color: Color) -> Vec<Move> {
    legal_moves_iter(board, color).collect()
}

/// Stops at the first legal move found.
#[must_use]
pub fn has_legal_move(board: &Board, color: Color) -> bool {
    legal_moves_iter(board, color).next().is_some()
}

/// The color is in check and no move gets it out.
#[must_use]
pub fn checkmate(board: &Board, color: Color) -> bool {
    board.in_check(color) && !has_legal_move(board, color)
}

/// The color is not in check but has no legal move.
#[must_use]
pub fn stalemate(board: &Board, color: Color) -> bool {
    !board.in_check(color) && !has_legal_move(board, color)
}

/// Coarse draw heuristic: each side has at most a king and one knight or
/// bishop. This does not detect every dead position.
#[must_use]
pub fn insufficient_material(board: &Board) -> bool {
    [Color::White, Color::Black].into_iter().all(|color| {
        let pieces = board.pieces(color);
        let mut others = pieces
            .iter()
            .filter(|(_, piece)| piece.kind != PieceKind::King);
        match (others.next(), others.next()) {
            (None, _) => true,
            (Some((_, piece)), None) => {
                matches!(piece.kind, PieceKind::Knight | PieceKind::Bishop)
            },
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn setup(fen: &str) -> Game {
        Game::from_fen(fen).expect("valid position")
    }

    fn play_all(game: &mut Game, moves: &[&str]) {
        for mv in moves {
            let (from, to) = mv.split_at(2);
            game.play(from, to, None)
                .unwrap_or_else(|error| panic!("{mv} should be legal: {error}"));
        }
    }

    #[test]
    fn turn_order() {
        let mut game = Game::new();
        assert!(matches!(
            game.play("e7", "e5", None),
            Err(Error::IllegalMove(_))
        ));
        play_all(&mut game, &["e2e4"]);
        assert_eq!(game.side_to_move(), Color::Black);
        assert!(game.play("d2", "d4", None).is_err());
        play_all(&mut game, &["e7e5"]);
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn self_check_is_rejected() {
        let mut game = setup("7b/8/8/8/8/8/1P6/K7 w - -");
        let before = game.board().clone();
        assert!(matches!(
            game.play("b2", "b4", None),
            Err(Error::IllegalMove(_))
        ));
        assert!(matches!(
            game.play("b2", "b3", None),
            Err(Error::IllegalMove(_))
        ));
        assert_eq!(game.board(), &before);
        assert!(game.history().is_empty());
        // The king can step away.
        play_all(&mut game, &["a1a2"]);
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let mut game = setup("4r1k1/8/8/8/8/8/4N3/4K3 w - -");
        assert!(game.play("e2", "c3", None).is_err());
        assert!(game.legal_moves().iter().all(|mv| mv.from() != Square::E2));
    }

    #[test]
    fn check_suffixes() {
        let mut game = Game::new();
        play_all(&mut game, &["e2e4", "f7f6", "d1h5"]);
        assert_eq!(game.history()[2].notation(), "Qd1h5+");
        assert_eq!(game.status(), Status::Check);

        let mut game = Game::new();
        play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(game.history()[3].notation(), "Qd8h4#");
        assert_eq!(
            game.status(),
            Status::Checkmate {
                winner: Color::Black
            }
        );
        assert!(game.legal_moves().is_empty());
    }

    #[test]
    fn checkmate_and_interposition() {
        let board = Board::from_fen("8/8/8/8/8/8/7R/k6R b - -").unwrap();
        assert!(checkmate(&board, Color::Black));
        assert!(!stalemate(&board, Color::Black));
        let board = Board::from_fen("1r6/8/8/8/8/8/7R/k6R b - -").unwrap();
        assert!(!checkmate(&board, Color::Black));
        assert_eq!(
            legal_moves(&board, Color::Black)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["b8b1"]
        );
    }

    #[test]
    fn stalemate_position() {
        let game = setup("k7/8/1Q6/8/8/8/8/2K5 b - -");
        assert!(stalemate(game.board(), Color::Black));
        assert!(!checkmate(game.board(), Color::Black));
        assert_eq!(game.status(), Status::Stalemate);
        assert!(game.status().is_terminal());
    }

    #[test]
    fn material() {
        for (fen, expected) in [
            ("8/8/8/4k3/8/8/8/4K3 w - -", true),
            ("8/8/8/4k3/8/8/8/4KN2 w - -", true),
            ("8/8/8/3bk3/8/8/8/4KN2 w - -", true),
            ("8/8/8/4k3/8/8/8/4KR2 w - -", false),
            ("8/8/8/4k3/8/8/8/3NKN2 w - -", false),
            ("8/8/8/4k3/8/4p3/8/4K3 w - -", false),
        ] {
            let board = Board::from_fen(fen).unwrap();
            assert_eq!(insufficient_material(&board), expected, "{fen}");
        }
        assert_eq!(
            setup("8/8/8/4k3/8/8/8/4K3 w - -").status(),
            Status::InsufficientMaterial
        );
    }

    #[test]
    fn threefold() {
        let mut game = Game::new();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        play_all(&mut game, &shuffle);
        // Second occurrence of the starting position.
        assert!(!game.threefold_repetition());
        play_all(&mut game, &shuffle[..3]);
        assert!(!game.threefold_repetition());
        play_all(&mut game, &shuffle[3..]);
        assert!(game.threefold_repetition());
        assert_eq!(game.status(), Status::ThreefoldRepetition);
    }

    #[test]
    fn castling_rights_in_fingerprint() {
        let mut game = Game::new();
        play_all(&mut game, &["e2e4", "e7e5", "e1e2", "e8e7", "e2e1", "e7e8"]);
        // Same placement, but the kings have moved.
        assert_eq!(
            game.board().fingerprint(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w - -"
        );
    }

    #[test]
    fn castling_through_the_game() {
        let mut game = Game::new();
        play_all(&mut game, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"]);
        assert_eq!(game.history()[6].notation(), "0-0");
        assert_eq!(
            game.board().at(Square::F1).map(|piece| piece.kind),
            Some(PieceKind::Rook)
        );
        assert_eq!(game.board().castle_rights().to_string(), "kq");
    }

    #[test]
    fn en_passant_window() {
        let mut game = Game::new();
        play_all(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        let mut taken = game.clone();
        play_all(&mut taken, &["e5d6"]);
        assert_eq!(taken.history()[4].notation(), "e5xd6e.p.");
        assert_eq!(taken.board().at(Square::D5), None);

        play_all(&mut game, &["h2h3", "h7h6"]);
        assert!(matches!(
            game.play("e5", "d6", None),
            Err(Error::IllegalMove(_))
        ));
    }

    #[test]
    fn promotion_choice() {
        let mut game = setup("4k3/1P6/8/8/8/8/8/4K3 w - -");
        game.play("b7", "b8", Some('n')).unwrap();
        assert_eq!(game.history()[0].notation(), "b7b8N");
        assert_eq!(
            game.board().at(Square::B8).map(|piece| piece.kind),
            Some(PieceKind::Knight)
        );
        let mut game = setup("4k3/1P6/8/8/8/8/8/4K3 w - -");
        game.play("b7", "b8", None).unwrap();
        assert_eq!(game.history()[0].notation(), "b7b8Q+");
        assert_eq!(
            game.legal_moves().len(),
            // King e8 escapes to e7, f7, d7 (d8 and f8 are covered by the
            // queen along the backrank).
            3
        );
    }

    #[test]
    fn promotions_are_enumerated() {
        let game = setup("4k3/P7/8/8/8/8/8/4K3 w - -");
        let promotions = game
            .legal_moves()
            .into_iter()
            .filter(Move::is_promotion)
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>();
        assert_eq!(promotions, vec!["a7a8q", "a7a8r", "a7a8b", "a7a8n"]);
    }

    #[test]
    fn history_rendering() {
        let mut game = setup("4k3/8/8/8/8/8/4P3/4K3 b - -");
        play_all(&mut game, &["e8d8", "e2e4", "d8e8"]);
        assert_eq!(game.render_history(), "1. ... Ke8d8\n2. e2e4 Kd8e8");
        assert_eq!(Game::new().render_history(), "");
    }
}

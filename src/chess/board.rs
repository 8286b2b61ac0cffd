//! Square-centric ("mailbox") board representation: every square holds an
//! optional piece. The board is a plain value: cloning it produces an
//! independent copy, which is how "what if" questions (would this move leave
//! my king in check?) are answered without touching the real game.

use std::fmt;

use anyhow::{bail, ensure};
use arrayvec::ArrayVec;
use strum::IntoEnumIterator;

use crate::chess::core::{
    CastleRights,
    Color,
    File,
    Piece,
    PieceKind,
    Rank,
    Square,
    BOARD_SIZE,
    BOARD_WIDTH,
};
use crate::chess::error::{Error, Result};
use crate::chess::moves::{Move, MoveKind};

/// Piece arrangement of the backrank, from the a-file to the h-file.
const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 8×8 grid of optional occupants plus the side to move and the move that was
/// played last (en passant eligibility depends on it).
///
/// The board does not enforce legality of the arrangement, but check detection
/// assumes exactly one king of each color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
    side_to_move: Color,
    last_move: Option<Move>,
}

/// Collection of pieces of one color together with their squares.
pub type Pieces = ArrayVec<(Square, Piece), { BOARD_SIZE as usize }>;

impl Board {
    /// Creates a board without any pieces, white to move.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
            side_to_move: Color::White,
            last_move: None,
        }
    }

    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use chessrules::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().fingerprint(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            for (file, kind) in File::iter().zip(BACKRANK) {
                board.place(
                    Some(Piece::new(color, kind)),
                    Square::new(file, Rank::backrank(color)),
                );
                board.place(
                    Some(Piece::new(color, PieceKind::Pawn)),
                    Square::new(file, Rank::pawns_starting(color)),
                );
            }
        }
        board
    }

    /// Puts the piece on the square (or clears it). There are no legality
    /// checks: this is used both for setting up positions and for executing
    /// moves.
    pub fn place(&mut self, piece: Option<Piece>, square: Square) {
        self.squares[square as usize] = piece;
    }

    /// Returns the piece standing on the square.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    /// Returns the piece standing on the square given in algebraic notation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if the square is malformed.
    pub fn occupant_at(&self, square: &str) -> Result<Option<Piece>> {
        Ok(self.at(Square::try_from(square)?))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[allow(missing_docs)]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// The move executed last, if any.
    #[must_use]
    pub const fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Records the executed move and passes the turn to the opponent of the
    /// moving side.
    pub(crate) fn advance(&mut self, executed: Move) {
        self.last_move = Some(executed);
        self.side_to_move = !executed.piece().owner;
    }

    /// Iterates over occupied squares in board scan order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL
            .iter()
            .filter_map(|&square| self.at(square).map(|piece| (square, piece)))
    }

    /// All pieces of the color in board scan order (rank-major, ascending).
    #[must_use]
    pub fn pieces(&self, color: Color) -> Pieces {
        self.occupied()
            .filter(|(_, piece)| piece.owner == color)
            .collect()
    }

    /// Signed `(d_rank, d_file)` deltas between two squares.
    #[must_use]
    pub fn distance_vector(from: Square, to: Square) -> (i8, i8) {
        let (from_rank, from_file) = from.indices();
        let (to_rank, to_file) = to.indices();
        (
            to_rank as i8 - from_rank as i8,
            to_file as i8 - from_file as i8,
        )
    }

    /// Unit step from `from` towards `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] unless the squares share a rank, a file
    /// or a diagonal: no piece can walk step by step along such a path.
    pub fn direction_vector(from: Square, to: Square) -> Result<(i8, i8)> {
        let (d_rank, d_file) = Self::distance_vector(from, to);
        if d_rank != 0 && d_file != 0 && d_rank.abs() != d_file.abs() {
            return Err(Error::illegal(format!(
                "{from} and {to} are not on the same rank, file or diagonal"
            )));
        }
        Ok((d_rank.signum(), d_file.signum()))
    }

    /// Checks whether any square strictly between `from` and `to` is
    /// occupied. Only meaningful for straight-line movement (sliding pieces,
    /// castling): knight moves are never blocked.
    ///
    /// # Errors
    ///
    /// Propagates [`Board::direction_vector`] failures.
    pub fn path_blocked(&self, from: Square, to: Square) -> Result<bool> {
        let (d_rank, d_file) = Self::direction_vector(from, to)?;
        let mut current = from;
        while let Some(next) = current.offset(d_rank, d_file) {
            if next == to {
                return Ok(false);
            }
            if self.at(next).is_some() {
                return Ok(true);
            }
            current = next;
        }
        Ok(false)
    }

    /// Checks whether any piece of `by` could reach the square under its own
    /// movement (or pawn capture) rule.
    ///
    /// NOTE: This is a one-ply query: it deliberately ignores whether the
    /// attacker is pinned or whether capturing would expose its own king.
    /// Full legality would recurse back into check detection.
    #[must_use]
    pub fn square_attacked(&self, square: Square, by: Color) -> bool {
        self.occupied().any(|(from, piece)| {
            piece.owner == by && from != square && piece.defends_square(self, from, square)
        })
    }

    /// Locates the king of the color.
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.occupied()
            .find(|(_, piece)| piece.owner == color && piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Checks whether the king of the color is attacked. A board without such
    /// king is never in check.
    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.square_attacked(king, !color))
    }

    /// Castling availability as in FEN: only looks at whether kings and rooks
    /// are still unmoved on their original squares.
    #[must_use]
    pub fn castle_rights(&self) -> CastleRights {
        let unmoved = |color: Color, kind: PieceKind, file: File| {
            self.at(Square::new(file, Rank::backrank(color)))
                .is_some_and(|piece| {
                    piece.owner == color && piece.kind == kind && !piece.has_moved
                })
        };
        let mut rights = CastleRights::NONE;
        for color in [Color::White, Color::Black] {
            if !unmoved(color, PieceKind::King, File::E) {
                continue;
            }
            if unmoved(color, PieceKind::Rook, File::H) {
                rights |= CastleRights::side(color, true);
            }
            if unmoved(color, PieceKind::Rook, File::A) {
                rights |= CastleRights::side(color, false);
            }
        }
        rights
    }

    /// The square a pawn passed over with its double step if that step was
    /// the last move.
    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.last_move
            .filter(|last| last.kind() == MoveKind::FirstPawnMove)
            .and_then(|last| last.from().offset(last.piece().owner.pawn_direction(), 0))
    }

    /// Piece placement part of FEN: ranks from 8 to 1, runs of empty squares
    /// compressed to digits.
    #[must_use]
    pub fn placement(&self) -> String {
        let mut result = String::with_capacity(BOARD_SIZE as usize + 7);
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0u8;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            result.push(char::from(b'0' + empty_squares));
                            empty_squares = 0;
                        }
                        result.push_str(&piece.to_string());
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                result.push(char::from(b'0' + empty_squares));
            }
            if rank != Rank::One {
                result.push('/');
            }
        }
        result
    }

    /// FEN-like string identifying the position for repetition detection:
    /// placement, side to move, castling availability and en passant target.
    /// Move counters are deliberately left out.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        format!(
            "{} {} {} {}",
            self.placement(),
            self.side_to_move,
            self.castle_rights(),
            self.en_passant_target()
                .map_or_else(|| "-".to_string(), |square| square.to_string())
        )
    }

    /// Parses board from [Forsyth-Edwards Notation]. Only the piece placement
    /// is required: side to move defaults to white, castling availability to
    /// whatever the unmoved pieces allow. The halfmove clock and fullmove
    /// counter are accepted for compatibility but not tracked.
    ///
    /// Castling availability marks kings and rooks as moved when they lost the
    /// right to castle. An en passant target square is turned into the double
    /// pawn step that would have produced it.
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    ///
    /// # Errors
    ///
    /// Returns an error describing the first malformed or inconsistent part.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split_ascii_whitespace();
        let mut board = Self::empty();
        let Some(pieces_placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let ranks = pieces_placement.split('/').collect::<Vec<_>>();
        ensure!(
            ranks.len() == BOARD_WIDTH as usize,
            "incorrect FEN: expected 8 ranks, got {pieces_placement}"
        );
        for (rank_fen, rank) in ranks.iter().zip(Rank::iter().rev()) {
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                ensure!(
                    file < BOARD_WIDTH,
                    "incorrect FEN: rank {rank_fen} is longer than {BOARD_WIDTH} squares"
                );
                if let '1'..='8' = symbol {
                    file += symbol as u8 - b'0';
                    continue;
                }
                let piece = Piece::try_from(symbol)?;
                board.place(Some(piece), Square::new(File::try_from(file)?, rank));
                file += 1;
            }
            ensure!(
                file == BOARD_WIDTH,
                "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of \
                 length {file}"
            );
        }
        if let Some(side_to_move) = parts.next() {
            board.side_to_move = side_to_move.try_into()?;
        }
        if let Some(castling) = parts.next() {
            board.restrict_castling(CastleRights::try_from(castling)?)?;
        }
        match parts.next() {
            None | Some("-") => {},
            Some(target) => board.replay_double_step(Square::try_from(target)?)?,
        }
        for counter in parts.by_ref().take(2) {
            ensure!(
                counter.bytes().all(|c| c.is_ascii_digit()),
                "incorrect FEN: move counters can only contain digits, got {counter}"
            );
        }
        ensure!(
            parts.next().is_none(),
            "trailing symbols are not allowed in FEN"
        );
        Ok(board)
    }

    fn restrict_castling(&mut self, rights: CastleRights) -> anyhow::Result<()> {
        let available = self.castle_rights();
        ensure!(
            available.contains(rights),
            "castle rights {rights} are not possible with kings and rooks at {available}"
        );
        for color in [Color::White, Color::Black] {
            let backrank = Rank::backrank(color);
            let short = rights.contains(CastleRights::side(color, true));
            let long = rights.contains(CastleRights::side(color, false));
            for (file, keeps_right) in [(File::E, short || long), (File::H, short), (File::A, long)]
            {
                let square = Square::new(file, backrank);
                if let Some(mut piece) = self.at(square) {
                    if !keeps_right {
                        piece.has_moved = true;
                        self.place(Some(piece), square);
                    }
                }
            }
        }
        Ok(())
    }

    fn replay_double_step(&mut self, target: Square) -> anyhow::Result<()> {
        let mover = !self.side_to_move;
        let expected_rank = match self.side_to_move {
            Color::White => Rank::Six,
            Color::Black => Rank::Three,
        };
        ensure!(
            target.rank() == expected_rank,
            "expected en passant square to be on rank {expected_rank}, got {}",
            target.rank()
        );
        let (Some(origin), Some(landing)) = (
            target.offset(-mover.pawn_direction(), 0),
            target.offset(mover.pawn_direction(), 0),
        ) else {
            bail!("en passant square {target} is on the edge of the board");
        };
        let pawn = Piece::new(mover, PieceKind::Pawn);
        ensure!(
            self.at(landing) == Some(pawn),
            "en passant square is not beyond pushed pawn"
        );
        ensure!(
            self.at(target).is_none() && self.at(origin).is_none(),
            "en passant square and the pawn's origin should be empty"
        );
        self.last_move = Some(Move::double_step(origin, landing, pawn));
        Ok(())
    }
}

impl fmt::Display for Board {
    /// Renders the board from White's point of view: rank 8 on top, each
    /// square either `.` or the FEN symbol of its piece.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            write!(f, "{rank}")?;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, " {piece}")?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, " ")?;
        for file in File::iter() {
            write!(f, " {file}")?;
        }
        writeln!(f)
    }
}

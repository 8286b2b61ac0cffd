//! Moves: classification of a raw `(from, to)` pair against a position,
//! validation of the rule preconditions of each move kind and execution on the
//! board.
//!
//! A [`Move`] is a snapshot of the position it was built from: it remembers
//! the moving (and captured) piece and refuses to validate against a board
//! where those differ. Moves are rebuilt, never reused, for a different board.

use std::fmt;

use crate::chess::board::Board;
use crate::chess::core::{File, Piece, PieceKind, Rank, Square};
use crate::chess::error::{Error, Result};

/// Closed set of move kinds. Each kind carries its own validation and
/// execution semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Plain relocation onto an empty square.
    Normal,
    /// Relocation onto a square held by an opposing piece.
    Capture,
    /// King moves two squares towards a rook which jumps over it.
    Castle,
    /// Pawn double step from its starting rank. Enables en passant for the
    /// opponent's reply.
    FirstPawnMove,
    /// Diagonal pawn move onto an empty square capturing the pawn that has
    /// just passed it.
    EnPassant,
    /// Pawn reaching the last rank, replaced by the carried piece kind.
    Promotion(PieceKind),
}

/// A move bound to the position it was classified against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    captured: Option<Piece>,
    kind: MoveKind,
}

impl Move {
    /// Classifies the move of the piece on `from` to `to`. Pawns reaching the
    /// last rank are promoted to a queen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] if the squares coincide or there is no
    /// piece on `from`. Whether the move is actually legal is decided by
    /// [`Move::validate`].
    pub fn new(board: &Board, from: Square, to: Square) -> Result<Self> {
        Self::with_promotion(board, from, to, None)
    }

    /// Classifies the move, using the promotion selector if the move turns out
    /// to be a promotion. Classification goes in priority order: castle,
    /// promotion, en passant, pawn double step, capture, normal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] if the squares coincide, there is no
    /// piece on `from`, the selector is not one of queen, rook, bishop or
    /// knight, or a selector is given for a move that does not promote.
    pub fn with_promotion(
        board: &Board,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Self> {
        if from == to {
            return Err(Error::illegal(format!(
                "origin and destination are the same square {from}"
            )));
        }
        let Some(piece) = board.at(from) else {
            return Err(Error::illegal(format!("there is no piece on {from}")));
        };
        if let Some(promoted) = promotion {
            if !PieceKind::PROMOTIONS.contains(&promoted) {
                return Err(Error::illegal(format!(
                    "pawns can not be promoted to {promoted:?}"
                )));
            }
        }
        let (d_rank, d_file) = Board::distance_vector(from, to);
        let forward = piece.owner.pawn_direction();
        let mut captured = board.at(to);
        let kind = match piece.kind {
            PieceKind::King if d_rank == 0 && d_file.abs() == 2 => MoveKind::Castle,
            PieceKind::Pawn if from.rank() == Rank::pawns_promoting(piece.owner) => {
                MoveKind::Promotion(promotion.unwrap_or(PieceKind::Queen))
            },
            PieceKind::Pawn if d_rank == forward && d_file.abs() == 1 && captured.is_none() => {
                captured = board.at(Square::new(to.file(), from.rank()));
                MoveKind::EnPassant
            },
            PieceKind::Pawn if d_rank == 2 * forward && d_file == 0 => MoveKind::FirstPawnMove,
            _ if captured.is_some_and(|target| target.owner != piece.owner) => MoveKind::Capture,
            _ => MoveKind::Normal,
        };
        if promotion.is_some() && !matches!(kind, MoveKind::Promotion(_)) {
            return Err(Error::illegal(format!(
                "{from}{to} does not bring a pawn to the last rank, promotion is not possible"
            )));
        }
        Ok(Self {
            from,
            to,
            piece,
            captured,
            kind,
        })
    }

    /// Parses squares in algebraic notation and an optional promotion
    /// selector (one of "qrbn") and classifies the move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] for malformed squares and
    /// [`Error::IllegalMove`] for the cases [`Move::with_promotion`] rejects.
    pub fn parse(board: &Board, from: &str, to: &str, promotion: Option<char>) -> Result<Self> {
        let from = Square::try_from(from)?;
        let to = Square::try_from(to)?;
        let promotion = promotion.map(PieceKind::try_from).transpose()?;
        Self::with_promotion(board, from, to, promotion)
    }

    /// Pawn double step as implied by an en passant target in FEN.
    pub(crate) const fn double_step(from: Square, to: Square, pawn: Piece) -> Self {
        Self {
            from,
            to,
            piece: pawn,
            captured: None,
            kind: MoveKind::FirstPawnMove,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The piece that stood on the origin square when the move was built.
    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    /// The piece removed from the board by this move, if any. For en passant
    /// this is the pawn beside the origin, not the (empty) destination.
    #[must_use]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_castle(&self) -> bool {
        self.kind == MoveKind::Castle
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_promotion(&self) -> bool {
        matches!(self.kind, MoveKind::Promotion(_))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_en_passant(&self) -> bool {
        self.kind == MoveKind::EnPassant
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_first_pawn_move(&self) -> bool {
        self.kind == MoveKind::FirstPawnMove
    }

    /// Whether the move removes an opposing piece from the board (plain
    /// captures, en passant and capturing promotions).
    #[must_use]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some_and(|target| target.owner != self.piece.owner)
    }

    /// Square of the pawn removed by en passant.
    const fn en_passant_victim(&self) -> Square {
        Square::new(self.to.file(), self.from.rank())
    }

    /// Rook origin and destination for castling.
    const fn castle_rook_squares(&self) -> (Square, Square) {
        let rank = self.from.rank();
        if self.to as u8 > self.from as u8 {
            (Square::new(File::H, rank), Square::new(File::F, rank))
        } else {
            (Square::new(File::A, rank), Square::new(File::D, rank))
        }
    }

    /// Checks the rule preconditions of the move kind against the board. This
    /// does not check whose turn it is or whether the move exposes the own
    /// king: both are [`crate::chess::game::Game`] concerns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] with the violated rule.
    pub fn validate(&self, board: &Board) -> Result<()> {
        if board.at(self.from) != Some(self.piece) {
            return Err(Error::illegal(format!(
                "{self} was built for a different position: {} is not on {}",
                self.piece, self.from
            )));
        }
        let victim_square = match self.kind {
            MoveKind::EnPassant => self.en_passant_victim(),
            _ => self.to,
        };
        if board.at(victim_square) != self.captured {
            return Err(Error::illegal(format!(
                "{self} was built for a different position: {victim_square} changed"
            )));
        }
        match self.kind {
            MoveKind::Normal | MoveKind::Promotion(_) => self.validate_piece_rule(board),
            MoveKind::Capture => {
                if !self.is_capture() {
                    return Err(Error::illegal(format!(
                        "{} can not capture own piece on {}",
                        self.piece, self.to
                    )));
                }
                self.validate_piece_rule(board)
            },
            MoveKind::FirstPawnMove => {
                if self.from.rank() != Rank::pawns_starting(self.piece.owner) {
                    return Err(Error::illegal(format!(
                        "pawn can only advance two squares from its starting rank, not from {}",
                        self.from
                    )));
                }
                self.validate_piece_rule(board)
            },
            MoveKind::EnPassant => self.validate_en_passant(board),
            MoveKind::Castle => self.validate_castle(board),
        }
    }

    fn validate_piece_rule(&self, board: &Board) -> Result<()> {
        if self.piece.can_move_to(board, self.from, self.to) {
            return Ok(());
        }
        Err(Error::illegal(format!(
            "{:?} can not move from {} to {}",
            self.piece.kind, self.from, self.to
        )))
    }

    fn validate_en_passant(&self, board: &Board) -> Result<()> {
        let victim = self.en_passant_victim();
        let eligible = board.last_move().is_some_and(|last| {
            last.kind == MoveKind::FirstPawnMove
                && last.piece.owner != self.piece.owner
                && last.to == victim
        });
        if eligible && board.at(victim).is_some_and(|pawn| pawn.kind == PieceKind::Pawn) {
            return Ok(());
        }
        Err(Error::illegal(format!(
            "en passant {}x{} is only possible right after the opponent's pawn double step to {}",
            self.from, self.to, victim
        )))
    }

    fn validate_castle(&self, board: &Board) -> Result<()> {
        let owner = self.piece.owner;
        if self.piece.has_moved || self.from != Square::new(File::E, Rank::backrank(owner)) {
            return Err(Error::illegal("king has already moved"));
        }
        let (rook_square, _) = self.castle_rook_squares();
        if !board.at(rook_square).is_some_and(|rook| {
            rook.owner == owner && rook.kind == PieceKind::Rook && !rook.has_moved
        }) {
            return Err(Error::illegal(format!(
                "there is no unmoved rook on {rook_square} to castle with"
            )));
        }
        if board.path_blocked(self.from, rook_square)? {
            return Err(Error::illegal(format!(
                "squares between {} and {rook_square} are occupied",
                self.from
            )));
        }
        if board.in_check(owner) {
            return Err(Error::illegal("can not castle out of check"));
        }
        let step = if self.to as u8 > self.from as u8 { 1 } else { -1 };
        for transit in [self.from.offset(0, step), Some(self.to)].into_iter().flatten() {
            if board.square_attacked(transit, !owner) {
                return Err(Error::illegal(format!(
                    "king can not castle through attacked square {transit}"
                )));
            }
        }
        Ok(())
    }

    /// Updates the occupancy of the board. Kings and rooks that move are
    /// marked as moved. Side to move and last move are left to the caller.
    pub fn execute(&self, board: &mut Board) {
        let mut piece = self.piece;
        if matches!(piece.kind, PieceKind::King | PieceKind::Rook) {
            piece.has_moved = true;
        }
        board.place(None, self.from);
        match self.kind {
            MoveKind::Castle => {
                let (rook_from, rook_to) = self.castle_rook_squares();
                let rook = board.at(rook_from).map(|mut rook| {
                    rook.has_moved = true;
                    rook
                });
                board.place(None, rook_from);
                board.place(rook, rook_to);
                board.place(Some(piece), self.to);
            },
            MoveKind::EnPassant => {
                board.place(None, self.en_passant_victim());
                board.place(Some(piece), self.to);
            },
            MoveKind::Promotion(promoted) => {
                let mut promoted = Piece::new(piece.owner, promoted);
                promoted.has_moved = true;
                board.place(Some(promoted), self.to);
            },
            MoveKind::Normal | MoveKind::Capture | MoveKind::FirstPawnMove => {
                board.place(Some(piece), self.to);
            },
        }
    }

    /// Long algebraic notation of the move without check or checkmate suffix:
    ///
    /// ```
    /// use chessrules::chess::board::Board;
    /// use chessrules::chess::moves::Move;
    ///
    /// let board = Board::starting();
    /// let knight = Move::parse(&board, "g1", "f3", None).unwrap();
    /// assert_eq!(knight.long_notation(), "Ng1f3");
    /// let pawn = Move::parse(&board, "e2", "e4", None).unwrap();
    /// assert_eq!(pawn.long_notation(), "e2e4");
    /// ```
    #[must_use]
    pub fn long_notation(&self) -> String {
        let letter = self
            .piece
            .kind
            .notation_letter()
            .map_or_else(String::new, String::from);
        match self.kind {
            MoveKind::Normal | MoveKind::FirstPawnMove => {
                format!("{letter}{}{}", self.from, self.to)
            },
            MoveKind::Capture => format!("{letter}{}x{}", self.from, self.to),
            MoveKind::Castle => {
                if self.to.file() == File::G {
                    "0-0".to_string()
                } else {
                    "0-0-0".to_string()
                }
            },
            MoveKind::EnPassant => format!("{}x{}e.p.", self.from, self.to),
            MoveKind::Promotion(promoted) => format!(
                "{}{}{}{}",
                self.from,
                if self.is_capture() { "x" } else { "" },
                self.to,
                promoted.notation_letter().unwrap_or('Q')
            ),
        }
    }
}

impl fmt::Display for Move {
    /// Prints the move in UCI format: `<from><to>[promotion]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let MoveKind::Promotion(promoted) = self.kind {
            write!(f, "{promoted}")?;
        }
        Ok(())
    }
}

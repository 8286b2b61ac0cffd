//! Movement rules of each piece kind, expressed over the geometry primitives of
//! [`Board`]. The piece set is closed, so the rules are dispatched through a
//! single `match` on [`PieceKind`] with per-kind direction tables.

use crate::chess::board::Board;
use crate::chess::core::{Piece, PieceKind, Rank, Square};

/// `(d_rank, d_file)` steps of a rook.
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
/// `(d_rank, d_file)` steps of a bishop.
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
/// Queen slides in every direction; king steps in every direction once.
pub const ROYAL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
/// Knight jumps.
pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// Checks whether a sliding piece moving along one of `directions` can get
/// from `from` to `to`: the squares have to be aligned along one of these
/// directions with nothing in between. Occupancy of `to` is not considered.
#[must_use]
pub fn slides(board: &Board, from: Square, to: Square, directions: &[(i8, i8)]) -> bool {
    match Board::direction_vector(from, to) {
        Ok(direction) if directions.contains(&direction) => {
            matches!(board.path_blocked(from, to), Ok(false))
        },
        _ => false,
    }
}

impl Piece {
    /// Checks whether the piece standing on `from` may move to `to` under its
    /// own movement rule. This is geometry plus occupancy: it does not look at
    /// whose turn it is or whether the move would expose the own king (except
    /// for the king itself, which may never step onto an attacked square).
    ///
    /// Special moves (castling, en passant) are validated by
    /// [`crate::chess::moves::Move`].
    #[must_use]
    pub fn can_move_to(self, board: &Board, from: Square, to: Square) -> bool {
        if from == to {
            return false;
        }
        let target = board.at(to);
        // Own pieces can never be captured.
        if target.is_some_and(|occupant| occupant.owner == self.owner) {
            return false;
        }
        let (d_rank, d_file) = Board::distance_vector(from, to);
        match self.kind {
            PieceKind::Pawn => {
                let forward = self.owner.pawn_direction();
                match (d_rank, d_file.abs()) {
                    (d, 0) if d == forward => target.is_none(),
                    (d, 0) if d == 2 * forward => {
                        from.rank() == Rank::pawns_starting(self.owner)
                            && target.is_none()
                            && matches!(board.path_blocked(from, to), Ok(false))
                    },
                    (d, 1) if d == forward => target.is_some(),
                    _ => false,
                }
            },
            PieceKind::Knight => KNIGHT_JUMPS.contains(&(d_rank, d_file)),
            PieceKind::Bishop => slides(board, from, to, &BISHOP_DIRECTIONS),
            PieceKind::Rook => slides(board, from, to, &ROOK_DIRECTIONS),
            PieceKind::Queen => slides(board, from, to, &ROYAL_DIRECTIONS),
            PieceKind::King => {
                ROYAL_DIRECTIONS.contains(&(d_rank, d_file))
                    && !board.square_attacked(to, !self.owner)
            },
        }
    }

    /// Checks whether the piece standing on `from` attacks (or protects) `to`,
    /// regardless of what stands there. Used for king safety and castling
    /// queries only.
    ///
    /// NOTE: The king's coverage is plain adjacency. Asking whether the square
    /// is itself attacked would recurse into the opponent's king coverage.
    #[must_use]
    pub fn defends_square(self, board: &Board, from: Square, to: Square) -> bool {
        let (d_rank, d_file) = Board::distance_vector(from, to);
        match self.kind {
            PieceKind::Pawn => d_rank == self.owner.pawn_direction() && d_file.abs() == 1,
            PieceKind::Knight => KNIGHT_JUMPS.contains(&(d_rank, d_file)),
            PieceKind::Bishop => slides(board, from, to, &BISHOP_DIRECTIONS),
            PieceKind::Rook => slides(board, from, to, &ROOK_DIRECTIONS),
            PieceKind::Queen => slides(board, from, to, &ROYAL_DIRECTIONS),
            PieceKind::King => ROYAL_DIRECTIONS.contains(&(d_rank, d_file)),
        }
    }
}

//! [Perft] (*per*formance *t*esting) counts the leaf nodes of the legal move
//! tree up to a given depth. The numbers are well known for many positions,
//! which makes perft the standard correctness check for move legality.
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::chess::board::Board;
use crate::chess::game::legal_moves;

/// Counts the positions reachable from `board` in exactly `depth` plies.
#[must_use]
pub fn perft(board: &Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(board, board.side_to_move());
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .into_iter()
        .map(|mv| {
            let mut next = board.clone();
            mv.execute(&mut next);
            next.advance(mv);
            perft(&next, depth - 1)
        })
        .sum()
}

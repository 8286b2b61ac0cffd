#![no_main]
use chessrules::chess::core::{PieceKind, Square};
use chessrules::chess::game::Game;
use chessrules::chess::moves::Move;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

// Every three bytes are the origin, the destination and the promotion
// selector of a move attempted from the starting position.
fuzz_target!(|data: &[u8]| {
    let mut game = Game::new();
    for chunk in data.chunks_exact(3) {
        let from = Square::ALL[usize::from(chunk[0]) % Square::ALL.len()];
        let to = Square::ALL[usize::from(chunk[1]) % Square::ALL.len()];
        let promotion = match chunk[2] % 8 {
            0 => Some(PieceKind::Queen),
            1 => Some(PieceKind::Rook),
            2 => Some(PieceKind::Bishop),
            3 => Some(PieceKind::Knight),
            4 => Some(PieceKind::King),
            _ => None,
        };
        let Ok(mv) = Move::with_promotion(game.board(), from, to, promotion) else {
            continue;
        };
        let before = game.clone();
        let legal = game.legal_moves().contains(&mv);
        match game.add_move(mv) {
            Ok(()) => {
                assert!(legal, "accepted {mv} which is not among legal moves");
                assert_eq!(game.history().len(), before.history().len() + 1);
                assert_eq!(game.side_to_move(), !before.side_to_move());
            },
            Err(_) => {
                assert!(!legal, "rejected legal move {mv}");
                assert_eq!(game.board(), before.board());
                assert_eq!(game.history().len(), before.history().len());
            },
        }
    }
});

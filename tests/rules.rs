use chessrules::chess::board::Board;
use chessrules::chess::core::{self, Color, Piece, PieceKind, Square};
use chessrules::chess::game::{checkmate, insufficient_material, stalemate, Game, Status};
use chessrules::chess::Error;
use pretty_assertions::assert_eq;

fn board_with(pieces: &[(&str, Color, PieceKind)], side_to_move: Color) -> Board {
    let mut board = Board::empty();
    for &(square, owner, kind) in pieces {
        board.place(
            Some(Piece::new(owner, kind)),
            Square::try_from(square).unwrap(),
        );
    }
    board.set_side_to_move(side_to_move);
    board
}

fn assert_illegal<T: std::fmt::Debug>(result: chessrules::chess::Result<T>) {
    assert!(
        matches!(result, Err(Error::IllegalMove(_))),
        "expected illegal move, got {result:?}"
    );
}

#[test]
fn coordinates_round_trip() {
    for square in Square::ALL {
        let text = square.to_string();
        let (rank, file) = core::parse(&text).unwrap();
        assert_eq!(core::format(rank, file).unwrap(), text);
        assert_eq!(square.indices(), (rank, file));
    }
    for malformed in ["", "a", "a0", "a9", "i1", "A1", "1a", "a10", "e2 "] {
        assert!(
            matches!(core::parse(malformed), Err(Error::InvalidCoordinate(_))),
            "{malformed:?}"
        );
    }
    assert!(core::format(8, 0).is_err());
}

#[test]
fn exposing_own_king_is_rejected() {
    let board = board_with(
        &[
            ("a1", Color::White, PieceKind::King),
            ("b2", Color::White, PieceKind::Pawn),
            ("h8", Color::Black, PieceKind::Bishop),
            ("e8", Color::Black, PieceKind::King),
        ],
        Color::White,
    );
    let mut game = Game::from_board(board.clone());
    assert_illegal(game.play("b2", "b4", None));
    assert_eq!(game.board(), &board);
    assert!(game.history().is_empty());
    assert_eq!(game.side_to_move(), Color::White);
    game.play("a1", "b1", None).unwrap();
}

#[test]
fn rooks_checkmate_the_king() {
    let mut pieces = vec![
        ("a1", Color::Black, PieceKind::King),
        ("h1", Color::White, PieceKind::Rook),
        ("h2", Color::White, PieceKind::Rook),
        ("e4", Color::White, PieceKind::King),
    ];
    let board = board_with(&pieces, Color::Black);
    assert!(checkmate(&board, Color::Black));
    assert!(!stalemate(&board, Color::Black));
    assert!(!checkmate(&board, Color::White));
    assert_eq!(
        Game::from_board(board).status(),
        Status::Checkmate {
            winner: Color::White
        }
    );

    // The black rook can interpose on b1.
    pieces.push(("b8", Color::Black, PieceKind::Rook));
    let board = board_with(&pieces, Color::Black);
    assert!(!checkmate(&board, Color::Black));
    let mut game = Game::from_board(board);
    assert_eq!(game.status(), Status::Check);
    game.play("b8", "b1", None).unwrap();
    assert_eq!(game.history()[0].notation(), "Rb8b1");
}

#[test]
fn en_passant_only_right_after_double_step() {
    let mut game = Game::new();
    for (from, to) in [("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")] {
        game.play(from, to, None).unwrap();
    }
    let mut delayed = game.clone();

    game.play("e5", "d6", None).unwrap();
    assert_eq!(game.history().last().unwrap().notation(), "e5xd6e.p.");
    assert_eq!(game.board().occupant_at("d5").unwrap(), None);

    delayed.play("g1", "f3", None).unwrap();
    delayed.play("a6", "a5", None).unwrap();
    let before = delayed.board().clone();
    assert_illegal(delayed.play("e5", "d6", None));
    assert_eq!(delayed.board(), &before);
}

#[test]
fn kings_shuffling_repeat_the_position() {
    let board = board_with(
        &[
            ("e1", Color::White, PieceKind::King),
            ("e8", Color::Black, PieceKind::King),
            ("a2", Color::White, PieceKind::Pawn),
        ],
        Color::White,
    );
    let mut game = Game::from_board(board);
    let shuffle = [("e1", "d1"), ("e8", "d8"), ("d1", "e1"), ("d8", "e8")];
    for (from, to) in shuffle {
        game.play(from, to, None).unwrap();
        assert!(!game.threefold_repetition());
    }
    // Second occurrence of the starting position.
    for (from, to) in &shuffle[..3] {
        game.play(from, to, None).unwrap();
        assert!(!game.threefold_repetition());
    }
    game.play("d8", "e8", None).unwrap();
    assert!(game.threefold_repetition());
    assert_eq!(game.status(), Status::ThreefoldRepetition);
}

#[test]
fn material() {
    let kings = [
        ("e1", Color::White, PieceKind::King),
        ("e8", Color::Black, PieceKind::King),
    ];
    assert!(insufficient_material(&board_with(&kings, Color::White)));

    let mut with_rook = kings.to_vec();
    with_rook.push(("a1", Color::White, PieceKind::Rook));
    assert!(!insufficient_material(&board_with(&with_rook, Color::White)));

    let mut minors = kings.to_vec();
    minors.push(("c1", Color::White, PieceKind::Bishop));
    minors.push(("b8", Color::Black, PieceKind::Knight));
    assert!(insufficient_material(&board_with(&minors, Color::White)));
}

#[test]
fn rejected_moves_leave_the_game_untouched() {
    let mut game = Game::new();
    let board = game.board().clone();
    assert_illegal(game.play("e7", "e5", None));
    assert_illegal(game.play("e2", "e5", None));
    assert_illegal(game.play("a1", "a3", None));
    assert_illegal(game.play("b1", "d2", None));
    assert_illegal(game.play("e3", "e4", None));
    assert_illegal(game.play("e2", "e4", Some('q')));
    assert!(matches!(
        game.play("e9", "e4", None),
        Err(Error::InvalidCoordinate(_))
    ));
    assert_eq!(game.board(), &board);
    assert!(game.history().is_empty());
}

#[test]
fn scholars_mate() {
    let mut game = Game::new();
    for (from, to) in [
        ("e2", "e4"),
        ("e7", "e5"),
        ("f1", "c4"),
        ("b8", "c6"),
        ("d1", "h5"),
        ("g8", "f6"),
        ("h5", "f7"),
    ] {
        game.play(from, to, None).unwrap();
    }
    assert_eq!(
        game.status(),
        Status::Checkmate {
            winner: Color::White
        }
    );
    assert_eq!(
        game.render_history(),
        "1. e2e4 e7e5\n2. Bf1c4 Nb8c6\n3. Qd1h5 Ng8f6\n4. Qh5xf7#"
    );
    assert!(game.legal_moves().is_empty());
}

#[test]
fn board_rendering() {
    let mut game = Game::new();
    game.play("e2", "e4", None).unwrap();
    assert_eq!(
        game.board().to_string(),
        "8 r n b q k b n r\n\
         7 p p p p p p p p\n\
         6 . . . . . . . .\n\
         5 . . . . . . . .\n\
         4 . . . . P . . .\n\
         3 . . . . . . . .\n\
         2 P P P P . P P P\n\
         1 R N B Q K B N R\n\
         \x20 a b c d e f g h\n"
    );
    assert_eq!(
        game.board().fingerprint(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3"
    );
}

#[test]
fn fen_parsing() {
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
        "2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - -",
        "rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6",
        "r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q -",
        "8/8/8/8/2P5/3k4/8/KB6 b - c3",
    ] {
        assert_eq!(Board::from_fen(fen).unwrap().fingerprint(), fen);
        assert_eq!(
            Board::from_fen(&format!("{fen} 0 1")).unwrap().fingerprint(),
            fen
        );
    }
    for malformed in [
        "",
        "8/8/8/8/8/8/8 w - -",
        "9/8/8/8/8/8/8/8 w - -",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq -",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq -",
        // Rook on h1 has already left.
        "rnbqkbn1/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN1 w KQkq -",
        // No pawn behind the en passant square.
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq e3",
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3",
        "8/8/8/8/8/8/8/8 w - - 0 1 extra",
    ] {
        assert!(Board::from_fen(malformed).is_err(), "{malformed}");
    }
}

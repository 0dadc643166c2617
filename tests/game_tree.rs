use chess_tree::board::{Color, Piece, Square};
use chess_tree::game::GameController;

fn sq(s: &str) -> Square {
    s.parse().expect("valid square")
}

fn play(game: &mut GameController, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        game.on_move(sq(from), sq(to))
            .unwrap_or_else(|err| panic!("{from}{to} rejected: {err}"));
    }
}

#[test]
fn both_sides_castle_kingside() {
    let mut game = GameController::new();
    play(
        &mut game,
        &[
            ("e2", "e4"),
            ("e7", "e5"),
            ("g1", "f3"),
            ("g8", "f6"),
            ("f1", "c4"),
            ("f8", "c5"),
            ("e1", "g1"),
            ("e8", "g8"),
        ],
    );

    let state = game.current_state();
    let board = state.board();
    assert_eq!(board.kind_at(sq("g1")), Some((Color::White, Piece::King)));
    assert_eq!(board.kind_at(sq("f1")), Some((Color::White, Piece::Rook)));
    assert_eq!(board.kind_at(sq("g8")), Some((Color::Black, Piece::King)));
    assert_eq!(board.kind_at(sq("f8")), Some((Color::Black, Piece::Rook)));
    assert!(board.is_empty(sq("e1")));
    assert!(board.is_empty(sq("h8")));
    assert_eq!(state.notation(), Some("O-O"));
    assert_eq!(state.ply(), 8);
}

#[test]
fn ten_move_stalemate() {
    let mut game = GameController::new();
    game.import_notation(
        "1. e3 a5 2. Qh5 Ra6 3. Qxa5 h5 4. h4 Rah6 5. Qxc7 f6 6. Qxd7+ Kf7 \
         7. Qxb7 Qd3 8. Qxb8 Qh7 9. Qxc8 Kg6 10. Qe6",
    )
    .expect("game imports");

    let state = game.current_state();
    assert_eq!(state.turn(), Color::Black);
    assert!(state.is_stalemate());
    assert!(!state.is_checkmate());
    assert!(!state.is_check());
    assert!(state.is_game_over());
    assert_eq!(state.captured(Color::White).len(), 6);
}

#[test]
fn en_passant_removes_the_passed_pawn() {
    let mut game = GameController::new();
    play(
        &mut game,
        &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")],
    );
    assert!(game.current_state().legal_targets(sq("e5")).contains(&sq("d6")));

    play(&mut game, &[("e5", "d6")]);
    let state = game.current_state();
    assert_eq!(state.notation(), Some("exd6"));
    assert!(state.board().is_empty(sq("d5")));
    assert_eq!(
        state.board().kind_at(sq("d6")),
        Some((Color::White, Piece::Pawn))
    );
    assert_eq!(state.captured(Color::White).len(), 1);
    assert_eq!(state.captured(Color::White)[0].kind, Piece::Pawn);
}

#[test]
fn en_passant_expires_after_one_ply() {
    let mut game = GameController::new();
    play(
        &mut game,
        &[
            ("e2", "e4"),
            ("a7", "a6"),
            ("e4", "e5"),
            ("d7", "d5"),
            ("h2", "h3"),
            ("a6", "a5"),
        ],
    );
    assert!(!game.current_state().legal_targets(sq("e5")).contains(&sq("d6")));
}

#[test]
fn promoted_pawn_keeps_its_identity() {
    let mut game = GameController::from_fen("7k/3P4/8/8/8/8/8/K7 w - - 0 1").expect("valid FEN");
    let pawn = game
        .current_state()
        .board()
        .piece_at(sq("d7"))
        .expect("pawn on d7");

    game.on_move(sq("d7"), sq("d8")).expect("promotion is legal");
    let state = game.current_state();
    assert_eq!(state.board().piece_at(sq("d8")), Some(pawn));
    let info = state.board().info(pawn);
    assert_eq!(info.kind, Piece::Pawn);
    assert_eq!(info.effective(), Piece::Queen);
    assert_eq!(state.notation(), Some("d8=Q+"));
}

#[test]
fn pinned_piece_cannot_move() {
    let game = GameController::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").expect("valid FEN");
    let state = game.current_state();
    assert!(state.legal_targets(sq("e2")).is_empty());
    assert!(state.validate_move(sq("e2"), sq("c3")).is_err());
}

#[test]
fn navigation_walks_branches() {
    let mut game = GameController::new();
    game.import_notation("1. e4 e5 2. Nf3 Nc6").expect("imports");
    game.import_notation("1. e4 c5 2. Nf3 d6").expect("imports");
    game.import_notation("1. d4").expect("imports");

    assert!(game.select_first());
    assert!(game.is_current_node_root());
    assert_eq!(game.current_children().len(), 2);

    // Main line now follows the last import.
    assert!(game.select_last());
    assert_eq!(game.current_state().notation(), Some("d4"));
    assert!(game.is_current_node_leaf());

    assert!(game.select_next_sibling());
    assert_eq!(game.current_state().notation(), Some("e4"));
    assert!(game.select_last());
    assert_eq!(game.current_state().notation(), Some("d6"));

    assert!(game.select_previous_branch());
    assert_eq!(game.current_state().notation(), Some("c5"));
    assert!(game.select_next_sibling());
    assert_eq!(game.current_state().notation(), Some("e5"));
    assert!(game.select_last());
    assert_eq!(game.current_state().notation(), Some("Nc6"));

    let line: Vec<_> = game
        .current_line()
        .iter()
        .filter_map(|entry| entry.state.notation().map(str::to_string))
        .collect();
    assert_eq!(line, ["e4", "e5", "Nf3", "Nc6"]);
}

#[test]
fn removing_a_branch_prunes_it() {
    let mut game = GameController::new();
    game.import_notation("1. e4 e5 2. Nf3").expect("imports");
    game.import_notation("1. e4 c5").expect("imports");
    let before = game.tree().node_count();
    assert_eq!(before, 5);

    assert!(game.select_previous());
    let key = game.current_children()[0].key().expect("child has a key");
    assert!(game.remove_child(key));
    assert_eq!(game.tree().node_count(), 3);
    assert_eq!(game.current_children().len(), 1);
    assert!(!game.remove_child(key));
}

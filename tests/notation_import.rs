use chess_tree::board::{Color, Square};
use chess_tree::game::{AnnotationColor, GameController};
use chess_tree::notation::{resolve_san, GameResult, ImportError, SanError};

const OPENINGS: &[&str] = &[
    "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. Ba4 Nf6 5. O-O Be7 6. Re1 b5 7. Bb3 d6 8. c3 O-O",
    "1. d4 d5 2. c4 e6 3. Nc3 Nf6 4. Bg5 Be7 5. e3 O-O 6. Nf3 Nbd7 7. Rc1 c6",
    "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6 6. Be3 e5 7. Nb3 Be6 8. f3 Nbd7",
    "1. d4 Nf6 2. c4 g6 3. Nc3 Bg7 4. e4 d6 5. Nf3 O-O 6. Be2 e5 7. O-O Nc6 8. d5 Ne7",
    "1. e4 e6 2. d4 d5 3. Nc3 Bb4 4. e5 c5 5. a3 Bxc3+ 6. bxc3 Ne7 7. Qg4 O-O",
];

fn sq(s: &str) -> Square {
    s.parse().expect("valid square")
}

#[test]
fn fools_mate() {
    let mut game = GameController::new();
    let parsed = game.import_notation("1. f3 e5 2. g4 Qh4# 0-1").expect("imports");
    assert_eq!(parsed.result, Some(GameResult::BlackWins));
    let state = game.current_state();
    assert!(state.is_checkmate());
    assert_eq!(state.turn(), Color::White);
    assert_eq!(state.notation(), Some("Qh4#"));
}

#[test]
fn opera_game_ends_in_mate() {
    let mut game = GameController::new();
    let parsed = game
        .import_notation(include_str!("data/opera_game.pgn"))
        .expect("imports");
    assert_eq!(parsed.header("White"), Some("Paul Morphy"));
    assert_eq!(parsed.ply_count(), 33);
    assert_eq!(parsed.result, Some(GameResult::WhiteWins));

    let state = game.current_state();
    assert!(state.is_checkmate());
    assert_eq!(state.notation(), Some("Rd8#"));
    assert_eq!(game.tree().node_count(), 34);
}

#[test]
fn annotations_land_on_their_moves() {
    let mut game = GameController::new();
    game.import_notation(include_str!("data/annotated.pgn"))
        .expect("imports");
    assert_eq!(game.current_state().notation(), Some("a6"));

    let root = game.tree().root().state();
    assert_eq!(root.annotations().comments(), &["Starting comment".to_string()]);

    let line = game.current_line();
    let e4 = line[1].state.annotations();
    assert_eq!(e4.comments(), &["The most popular first move".to_string()]);
    assert_eq!(e4.mark_color(sq("e4")), Some(AnnotationColor::Green));
    assert_eq!(e4.mark_color(sq("d5")), Some(AnnotationColor::Red));
    assert_eq!(e4.arrow_color(sq("g1"), sq("f3")), Some(AnnotationColor::Green));
    assert!(line[2].state.annotations().is_empty());
}

#[test]
fn san_round_trips_through_resolution() {
    for text in OPENINGS {
        let mut game = GameController::new();
        game.import_notation(text)
            .unwrap_or_else(|err| panic!("{text}: {err}"));

        let line = game.current_line();
        for pair in line.windows(2) {
            let (before, after) = (pair[0].state, pair[1].state);
            let san = after.notation().expect("moved state has notation");
            let resolved = resolve_san(before, san)
                .unwrap_or_else(|err| panic!("{san} in {text}: {err}"));
            let key = after.key().expect("moved state has a key");
            assert_eq!((resolved.from, resolved.to), (key.from, key.to), "{san}");
        }
    }
}

#[test]
fn export_reimports_identically() {
    for text in OPENINGS {
        let mut game = GameController::new();
        game.import_notation(text).expect("imports");
        let exported = game.export_notation();

        let mut copy = GameController::new();
        copy.import_notation(&exported)
            .unwrap_or_else(|err| panic!("{exported}: {err}"));
        assert_eq!(copy.current_game(), game.current_game());
        assert_eq!(copy.current_state(), game.current_state());
    }
}

#[test]
fn rejects_illegal_san() {
    let mut game = GameController::new();
    let err = game.import_notation("1. e4 e5 2. Ke2 Ke7 3. Qe1 Nf3").unwrap_err();
    assert!(matches!(
        err,
        ImportError::San {
            ply: 6,
            source: SanError::NoMatchingMove { .. }
        }
    ));
    assert_eq!(game.tree().node_count(), 1);
}

#[test]
fn pawn_push_token_is_not_read_as_capture() {
    let mut game = GameController::new();
    let err = game.import_notation("1. e4 d5 2. d5").unwrap_err();
    assert!(matches!(
        err,
        ImportError::San {
            ply: 3,
            source: SanError::NoMatchingMove { .. }
        }
    ));
    assert!(game.is_current_node_root());

    game.import_notation("1. e4 d5 2. exd5").expect("imports");
    assert_eq!(game.current_state().notation(), Some("exd5"));
}

#[test]
fn rejects_variations() {
    let mut game = GameController::new();
    assert!(game.import_notation("1. e4 (1. d4) e5").is_err());
    assert!(game.is_current_node_root());
}

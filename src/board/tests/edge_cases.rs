//! Edge case tests for special chess positions and moves.

use crate::board::{Color, Piece, Position, Square};

fn position(fen: &str) -> Position {
    Position::try_from_fen(fen).unwrap().position
}

#[test]
fn test_stalemate_position() {
    let position = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!position.is_checkmate());
    assert!(position.is_stalemate());
    assert!(!position.has_legal_move(Color::Black));
}

#[test]
fn test_en_passant_removes_correct_pawn() {
    let mut position = position("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
    assert!(position.legal_targets(Square(4, 4)).contains(&Square(5, 3)));

    let last = position.play(Square(4, 4), Square(5, 3), Piece::Queen);
    assert!(last.en_passant);
    assert_eq!(
        last.captured.map(|id| (id.color, id.kind)),
        Some((Color::Black, Piece::Pawn))
    );
    assert!(position.board().is_empty(Square(4, 3)), "Captured pawn should be removed");
    assert_eq!(
        position.board().kind_at(Square(5, 3)),
        Some((Color::White, Piece::Pawn)),
        "Capturing pawn should be on d6"
    );
}

#[test]
fn test_en_passant_expires_after_one_move() {
    let mut position = position("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3");
    position.play(Square(0, 6), Square(2, 5), Piece::Queen);
    position.play(Square(7, 6), Square(5, 5), Piece::Queen);
    assert!(!position.legal_targets(Square(4, 4)).contains(&Square(5, 3)));
}

#[test]
fn test_en_passant_cannot_expose_king_along_rank() {
    let position = position("8/8/8/KPp4r/8/8/8/7k w - c6 0 1");
    assert_eq!(position.legal_targets(Square(4, 1)), vec![Square(5, 1)]);
}

#[test]
fn test_castling_blocked_by_check() {
    let position = position("r3k2r/8/8/8/4Q3/8/8/R3K2R b KQkq - 0 1");
    let targets = position.legal_targets(Square(7, 4));
    assert!(!targets.contains(&Square(7, 6)));
    assert!(!targets.contains(&Square(7, 2)));
}

#[test]
fn test_castling_through_attacked_square() {
    let position = position("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    let candidates = position.candidate_moves(Square(0, 4));
    assert!(candidates.contains(&Square(0, 6)), "raw candidate still offered");

    let targets = position.legal_targets(Square(0, 4));
    assert!(!targets.contains(&Square(0, 6)), "f1 is attacked");
    assert!(targets.contains(&Square(0, 2)), "queenside path is safe");
}

#[test]
fn test_castling_needs_empty_path() {
    let position = position("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1");
    let targets = position.candidate_moves(Square(0, 4));
    assert!(targets.contains(&Square(0, 6)));
    assert!(!targets.contains(&Square(0, 2)));
}

#[test]
fn test_castling_moves_rook() {
    let mut position = position("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    let last = position.play(Square(0, 4), Square(0, 2), Piece::Queen);
    assert_eq!(last.castle, Some(crate::board::CastleSide::Queen));
    assert_eq!(
        position.board().kind_at(Square(0, 3)),
        Some((Color::White, Piece::Rook))
    );
    assert!(position.board().is_empty(Square(0, 0)));
}

#[test]
fn test_pinned_piece_cannot_move() {
    let position = position("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1");
    assert!(!position.candidate_moves(Square(1, 4)).is_empty());
    assert!(position.legal_targets(Square(1, 4)).is_empty());
}

#[test]
fn test_checkmate_back_rank() {
    let mut position = position("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    assert!(position.legal_targets(Square(0, 0)).contains(&Square(7, 0)));

    position.play(Square(0, 0), Square(7, 0), Piece::Queen);
    assert!(position.is_checkmate());
    assert!(!position.is_stalemate());
}

#[test]
fn test_promoted_piece_moves_as_new_type() {
    let mut position = position("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let pawn = position.board().piece_at(Square(6, 0)).unwrap();

    let last = position.play(Square(6, 0), Square(7, 0), Piece::Queen);
    assert_eq!(last.promotion, Some(Piece::Queen));
    assert_eq!(position.board().piece_at(Square(7, 0)), Some(pawn));
    assert_eq!(pawn.kind, Piece::Pawn);
    assert_eq!(position.board().info(pawn).effective(), Piece::Queen);

    let targets = position.candidate_moves(Square(7, 0));
    assert!(targets.contains(&Square(7, 7)));
    assert!(targets.contains(&Square(1, 0)));
}

#[test]
fn test_underpromotion_to_knight() {
    let mut position = position("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    position.play(Square(6, 0), Square(7, 0), Piece::Knight);
    let mut targets = position.candidate_moves(Square(7, 0));
    targets.sort();
    assert_eq!(targets, vec![Square(5, 1), Square(6, 2)]);
}

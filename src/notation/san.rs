//! Standard Algebraic Notation (SAN) support.
//!
//! Encoding reads the transition between two game states; resolution maps a
//! SAN token back onto the legal moves of the state it applies to.
//!
//! # Examples
//! ```
//! use chess_tree::game::GameState;
//! use chess_tree::notation::{encode_move, resolve_san};
//!
//! let start = GameState::new();
//! let mv = resolve_san(&start, "Nf3").unwrap();
//! let next = start.apply_move(mv.from, mv.to, chess_tree::board::Piece::Queen).unwrap();
//! assert_eq!(encode_move(&start, &next), "Nf3");
//! ```

use super::error::SanError;
use crate::board::{file_char, file_to_index, rank_char, rank_to_index, CastleSide, Piece, Square};
use crate::game::GameState;

/// A SAN token matched to exactly one legal move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedMove {
    pub from: Square,
    pub to: Square,
    /// Promotion letter given in the token, if the move promotes.
    pub promotion: Option<Piece>,
}

/// Components of a non-castling SAN token.
#[derive(Debug, PartialEq, Eq)]
struct SanParts {
    piece: Piece,
    file_hint: Option<usize>,
    rank_hint: Option<usize>,
    capture: bool,
    target: Square,
    promotion: Option<Piece>,
}

/// Format the move that turned `before` into `after`.
///
/// # Panics
/// Panics if `after` was not produced by a move.
#[must_use]
pub fn encode_move(before: &GameState, after: &GameState) -> String {
    let Some(last) = after.last_move() else {
        panic!("encode_move called on a state without a last move");
    };
    let mut san = String::new();

    match last.castle {
        Some(CastleSide::King) => san.push_str("O-O"),
        Some(CastleSide::Queen) => san.push_str("O-O-O"),
        None => {
            if last.moved_as == Piece::Pawn {
                if last.is_capture() {
                    san.push(file_char(last.from.file()));
                }
            } else {
                san.push(last.moved_as.to_char().to_ascii_uppercase());
                let (needs_file, needs_rank) =
                    needs_disambiguation(before, last.from, last.to, last.moved_as);
                if needs_file {
                    san.push(file_char(last.from.file()));
                }
                if needs_rank {
                    san.push(rank_char(last.from.rank()));
                }
            }

            if last.is_capture() {
                san.push('x');
            }
            san.push_str(&last.to.to_string());

            if let Some(promo) = last.promotion {
                san.push('=');
                san.push(promo.to_char().to_ascii_uppercase());
            }
        }
    }

    let status = after.king_status(after.turn());
    if status.in_checkmate {
        san.push('#');
    } else if status.in_check {
        san.push('+');
    }
    san
}

/// Returns (`needs_file`, `needs_rank`) for a piece move in `state`.
fn needs_disambiguation(state: &GameState, from: Square, to: Square, kind: Piece) -> (bool, bool) {
    let color = state.turn();
    let board = state.board();
    let rivals: Vec<Square> = board
        .occupied_by(color)
        .map(|(sq, _)| sq)
        .filter(|&sq| {
            sq != from
                && board.kind_at(sq) == Some((color, kind))
                && state.legal_targets(sq).contains(&to)
        })
        .collect();

    if rivals.is_empty() {
        return (false, false);
    }

    let same_file = rivals.iter().any(|sq| sq.file() == from.file());
    let same_rank = rivals.iter().any(|sq| sq.rank() == from.rank());

    match (same_file, same_rank) {
        (false, _) => (true, false),
        (true, false) => (false, true),
        (true, true) => (true, true),
    }
}

fn castle_side(text: &str) -> Option<CastleSide> {
    match text {
        "O-O" | "0-0" => Some(CastleSide::King),
        "O-O-O" | "0-0-0" => Some(CastleSide::Queen),
        _ => None,
    }
}

/// Split `[piece][file][rank][x]<target>[=promotion]` into its parts.
fn scan(text: &str) -> Result<SanParts, SanError> {
    let chars: Vec<char> = text.chars().collect();
    let invalid = || SanError::InvalidSquare {
        notation: text.to_string(),
    };

    let (piece, rest) = match chars.first() {
        None => return Err(SanError::Empty),
        Some(&c) if c.is_ascii_uppercase() => {
            let piece = Piece::from_char(c)
                .filter(|p| *p != Piece::Pawn)
                .ok_or(SanError::InvalidPiece { char: c })?;
            (piece, &chars[1..])
        }
        Some(_) => (Piece::Pawn, &chars[..]),
    };

    // Promotion: "e8=Q" or "e8Q".
    let mut body = rest;
    let mut promotion = None;
    if let Some((&last, init)) = body.split_last() {
        if last.is_ascii_uppercase() {
            let kind = Piece::from_char(last)
                .filter(|p| p.is_promotion_target())
                .ok_or(SanError::InvalidPromotion { char: last })?;
            promotion = Some(kind);
            body = init.strip_suffix(&['=']).unwrap_or(init);
        }
    }

    if body.len() < 2 {
        return Err(invalid());
    }
    let (hints, dest) = body.split_at(body.len() - 2);
    let target = match (file_to_index(dest[0]), rank_to_index(dest[1])) {
        (Some(file), Some(rank)) => Square(rank, file),
        _ => return Err(invalid()),
    };

    let (hints, capture) = match hints.split_last() {
        Some((&'x', init)) => (init, true),
        _ => (hints, false),
    };

    let mut file_hint = None;
    let mut rank_hint = None;
    match hints {
        [] => {}
        [c] => {
            if let Some(file) = file_to_index(*c) {
                file_hint = Some(file);
            } else if let Some(rank) = rank_to_index(*c) {
                rank_hint = Some(rank);
            } else {
                return Err(invalid());
            }
        }
        [f, r] => {
            file_hint = Some(file_to_index(*f).ok_or_else(invalid)?);
            rank_hint = Some(rank_to_index(*r).ok_or_else(invalid)?);
        }
        _ => return Err(invalid()),
    }

    Ok(SanParts {
        piece,
        file_hint,
        rank_hint,
        capture,
        target,
        promotion,
    })
}

/// Find the single legal move in `state` that `token` describes.
///
/// Check, mate and `!?` suffixes are ignored. The capture marker is not
/// required to match.
pub fn resolve_san(state: &GameState, token: &str) -> Result<ResolvedMove, SanError> {
    let san = token.trim();
    let text = san.trim_end_matches(['+', '#', '!', '?']);
    if text.is_empty() {
        return Err(SanError::Empty);
    }
    let no_match = || SanError::NoMatchingMove {
        san: san.to_string(),
    };
    let color = state.turn();
    let board = state.board();

    if let Some(side) = castle_side(text) {
        let from = Square(color.back_rank(), 4);
        let to = Square(color.back_rank(), side.king_target_file());
        let is_king = board.kind_at(from) == Some((color, Piece::King));
        return if is_king && state.legal_targets(from).contains(&to) {
            Ok(ResolvedMove {
                from,
                to,
                promotion: None,
            })
        } else {
            Err(no_match())
        };
    }

    let parts = scan(text)?;
    let promotes = parts.piece == Piece::Pawn && parts.target.rank() == color.pawn_promotion_rank();
    if parts.promotion.is_some() && !promotes {
        return Err(no_match());
    }

    let reaches = |sq: Square| {
        board.kind_at(sq) == Some((color, parts.piece))
            && state.legal_targets(sq).contains(&parts.target)
    };
    // A pawn without a file prefix can only be pushing along the target file.
    let file_hint = match (parts.piece, parts.file_hint) {
        (Piece::Pawn, None) => Some(parts.target.file()),
        (_, hint) => hint,
    };
    let sources: Vec<Square> = match (file_hint, parts.rank_hint) {
        (Some(file), Some(rank)) => Some(Square(rank, file))
            .into_iter()
            .filter(|&sq| reaches(sq))
            .collect(),
        (file_hint, rank_hint) => board
            .occupied_by(color)
            .map(|(sq, _)| sq)
            .filter(|sq| file_hint.map_or(true, |f| sq.file() == f))
            .filter(|sq| rank_hint.map_or(true, |r| sq.rank() == r))
            .filter(|&sq| reaches(sq))
            .collect(),
    };

    match sources.as_slice() {
        [] => Err(no_match()),
        [from] => {
            trace_log!(
                trace,
                "resolved {san} to {from}{}{}",
                parts.target,
                if parts.capture { " (capture)" } else { "" }
            );
            Ok(ResolvedMove {
                from: *from,
                to: parts.target,
                promotion: parts.promotion,
            })
        }
        _ => Err(SanError::AmbiguousMove {
            san: san.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn encoded(fen: &str, from: &str, to: &str) -> String {
        let before = GameState::from_fen(fen).unwrap();
        let after = before.apply_move(sq(from), sq(to), Piece::Queen).unwrap();
        encode_move(&before, &after)
    }

    #[test]
    fn test_pawn_push_does_not_match_capture() {
        let mut state = GameState::new();
        for (from, to) in [("e2", "e4"), ("d7", "d5")] {
            state = state.apply_move(sq(from), sq(to), Piece::Queen).unwrap();
        }
        assert_eq!(
            resolve_san(&state, "d5"),
            Err(SanError::NoMatchingMove {
                san: "d5".to_string()
            })
        );
        let mv = resolve_san(&state, "exd5").unwrap();
        assert_eq!((mv.from, mv.to), (sq("e4"), sq("d5")));
        let mv = resolve_san(&state, "e5").unwrap();
        assert_eq!((mv.from, mv.to), (sq("e4"), sq("e5")));
    }

    #[test]
    fn test_pawn_and_knight() {
        let start = GameState::new();
        let mv = resolve_san(&start, "e4").unwrap();
        assert_eq!((mv.from, mv.to), (sq("e2"), sq("e4")));
        let mv = resolve_san(&start, "Nf3").unwrap();
        assert_eq!((mv.from, mv.to), (sq("g1"), sq("f3")));
        let after = start.apply_move(mv.from, mv.to, Piece::Queen).unwrap();
        assert_eq!(encode_move(&start, &after), "Nf3");
    }

    #[test]
    fn test_castling() {
        let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
        assert_eq!(encoded(fen, "e1", "g1"), "O-O");
        assert_eq!(encoded(fen, "e1", "c1"), "O-O-O");
        let state = GameState::from_fen(fen).unwrap();
        let mv = resolve_san(&state, "0-0-0").unwrap();
        assert_eq!((mv.from, mv.to), (sq("e1"), sq("c1")));
    }

    #[test]
    fn test_captures_and_en_passant() {
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2";
        assert_eq!(encoded(fen, "e4", "d5"), "exd5");
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2";
        assert_eq!(encoded(fen, "e5", "d6"), "exd6");
        let state = GameState::from_fen(fen).unwrap();
        let mv = resolve_san(&state, "exd6").unwrap();
        assert_eq!((mv.from, mv.to), (sq("e5"), sq("d6")));
    }

    #[test]
    fn test_promotion_with_check() {
        let fen = "8/4P3/8/8/k7/8/8/4K3 w - - 0 1";
        assert_eq!(encoded(fen, "e7", "e8"), "e8=Q+");
        let state = GameState::from_fen(fen).unwrap();
        let mv = resolve_san(&state, "e8=N").unwrap();
        assert_eq!(mv.promotion, Some(Piece::Knight));
        assert_eq!(
            resolve_san(&state, "e8=K"),
            Err(SanError::InvalidPromotion { char: 'K' })
        );
    }

    #[test]
    fn test_disambiguation_by_file() {
        let fen = "3k4/8/8/8/R6R/8/8/4K3 w - - 0 1";
        assert_eq!(encoded(fen, "a4", "d4"), "Rad4");
        let state = GameState::from_fen(fen).unwrap();
        assert_eq!(resolve_san(&state, "Rhd4").unwrap().from, sq("h4"));
        assert_eq!(
            resolve_san(&state, "Rd4"),
            Err(SanError::AmbiguousMove {
                san: "Rd4".to_string()
            })
        );
    }

    #[test]
    fn test_disambiguation_by_rank() {
        let fen = "4k3/8/8/R7/8/8/8/R3K3 w - - 0 1";
        assert_eq!(encoded(fen, "a1", "a3"), "R1a3");
        let state = GameState::from_fen(fen).unwrap();
        assert_eq!(resolve_san(&state, "R5a3").unwrap().from, sq("a5"));
    }

    #[test]
    fn test_disambiguation_by_both() {
        let fen = "8/8/8/7k/8/Q7/8/Q1Q4K w - - 0 1";
        assert_eq!(encoded(fen, "a1", "b2"), "Qa1b2");
        let state = GameState::from_fen(fen).unwrap();
        assert_eq!(resolve_san(&state, "Qc1b2").unwrap().from, sq("c1"));
    }

    #[test]
    fn test_no_matching_move() {
        let start = GameState::new();
        assert_eq!(
            resolve_san(&start, "e5"),
            Err(SanError::NoMatchingMove {
                san: "e5".to_string()
            })
        );
        assert_eq!(resolve_san(&start, "  "), Err(SanError::Empty));
        assert!(matches!(
            resolve_san(&start, "Zf3"),
            Err(SanError::InvalidPiece { char: 'Z' })
        ));
        assert!(matches!(
            resolve_san(&start, "Nz9"),
            Err(SanError::InvalidSquare { .. })
        ));
    }

    #[test]
    fn test_scan_parts() {
        let parts = scan("Nbxd7").unwrap();
        assert_eq!(parts.piece, Piece::Knight);
        assert_eq!(parts.file_hint, Some(1));
        assert_eq!(parts.rank_hint, None);
        assert!(parts.capture);
        assert_eq!(parts.target, Square(6, 3));
    }
}

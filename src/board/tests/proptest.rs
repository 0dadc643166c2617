//! Property-based tests using proptest.

use crate::board::{Color, Piece, Position, Square};
use proptest::prelude::*;

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=30usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn all_legal(position: &Position) -> Vec<(Square, Square)> {
    position
        .board()
        .occupied_by(position.turn())
        .flat_map(|(from, _)| {
            position
                .legal_targets(from)
                .into_iter()
                .map(move |to| (from, to))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: no legal move leaves the mover's king in the opponent's attacked set
    #[test]
    fn prop_legal_moves_are_legal(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let mut position = Position::standard();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = all_legal(&position);
            if moves.is_empty() {
                break;
            }
            let mover: Color = position.turn();
            for &(from, to) in &moves {
                let mut probe = position.clone();
                probe.play(from, to, Piece::Queen);
                let king = probe.board().king_square(mover).unwrap();
                prop_assert!(
                    !probe.board().attacked_by(mover.opponent()).contains(king),
                    "{}{} leaves the {} king attacked", from, to, mover
                );
            }
            let (from, to) = moves[rng.gen_range(0..moves.len())];
            position.play(from, to, Piece::Queen);
        }
    }

    /// Property: the outward attack probe agrees with the attacked-square set
    #[test]
    fn prop_attack_probe_matches_set(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let mut position = Position::standard();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = all_legal(&position);
            if moves.is_empty() {
                break;
            }
            let (from, to) = moves[rng.gen_range(0..moves.len())];
            position.play(from, to, Piece::Queen);
        }

        for color in Color::BOTH {
            let attacked = position.board().attacked_by(color);
            for sq in Square::ALL {
                prop_assert_eq!(
                    attacked.contains(sq),
                    position.board().is_square_attacked(sq, color)
                );
            }
        }
    }

    /// Property: FEN round-trip preserves the board and castling state
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let mut position = Position::standard();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = all_legal(&position);
            if moves.is_empty() {
                break;
            }
            let (from, to) = moves[rng.gen_range(0..moves.len())];
            position.play(from, to, Piece::Queen);
        }

        let fen = position.to_fen(0, 0);
        let restored = Position::try_from_fen(&fen).unwrap().position;
        prop_assert_eq!(restored.to_fen(0, 0), fen);
        prop_assert_eq!(restored.turn(), position.turn());
        for sq in Square::ALL {
            prop_assert_eq!(restored.board().kind_at(sq), position.board().kind_at(sq));
        }
    }
}

use super::super::{Board, CastleSide, Color, Piece, Position, Square};
use super::knights::KNIGHT_OFFSETS;
use super::sliders::{BISHOP_DIRECTIONS, ROOK_DIRECTIONS};

pub(crate) const KING_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl Position {
    pub(crate) fn generate_king_moves(&self, from: Square, color: Color) -> Vec<Square> {
        let mut moves = self.board.step_targets(from, color, &KING_OFFSETS);
        moves.extend(self.castling_candidates(from, color));
        moves
    }

    /// Raw castling targets: king and rook unmoved, rook still in its corner,
    /// nothing between them. Attacked transit squares are checked later.
    fn castling_candidates(&self, from: Square, color: Color) -> Vec<Square> {
        let mut moves = Vec::new();
        let back_rank = color.back_rank();
        let Some(king) = self.board.piece_at(from) else {
            return moves;
        };
        if from != Square(back_rank, 4) || self.moved.contains(&king) {
            return moves;
        }

        for side in [CastleSide::King, CastleSide::Queen] {
            let rook_sq = Square(back_rank, side.rook_file());
            let rook_ready = self.board.piece_at(rook_sq).is_some_and(|rook| {
                rook.color == color
                    && self.board.info(rook).effective() == Piece::Rook
                    && !self.moved.contains(&rook)
            });
            if !rook_ready {
                continue;
            }
            let (lo, hi) = if side.rook_file() > from.file() {
                (from.file() + 1, side.rook_file())
            } else {
                (side.rook_file() + 1, from.file())
            };
            if (lo..hi).all(|file| self.board.is_empty(Square(back_rank, file))) {
                moves.push(Square(back_rank, side.king_target_file()));
            }
        }
        moves
    }
}

impl Board {
    /// Whether `attacker` threatens `square`.
    ///
    /// Looks outward from the square instead of generating every attacker's
    /// moves; agrees with [`Board::attacked_by`] square for square.
    pub(crate) fn is_square_attacked(&self, square: Square, attacker: Color) -> bool {
        if self.color_at(square) == Some(attacker) {
            return false;
        }
        let holds = |sq: Option<Square>, kinds: &[Piece]| {
            sq.and_then(|sq| self.kind_at(sq))
                .is_some_and(|(color, kind)| color == attacker && kinds.contains(&kind))
        };

        let back = -attacker.pawn_direction();
        if holds(square.offset(back, -1), &[Piece::Pawn])
            || holds(square.offset(back, 1), &[Piece::Pawn])
        {
            return true;
        }
        if KNIGHT_OFFSETS
            .iter()
            .any(|&(dr, df)| holds(square.offset(dr, df), &[Piece::Knight]))
        {
            return true;
        }
        if KING_OFFSETS
            .iter()
            .any(|&(dr, df)| holds(square.offset(dr, df), &[Piece::King]))
        {
            return true;
        }
        if ROOK_DIRECTIONS.iter().any(|&(dr, df)| {
            holds(self.first_along(square, dr, df), &[Piece::Rook, Piece::Queen])
        }) {
            return true;
        }
        BISHOP_DIRECTIONS.iter().any(|&(dr, df)| {
            holds(self.first_along(square, dr, df), &[Piece::Bishop, Piece::Queen])
        })
    }
}

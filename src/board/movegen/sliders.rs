use super::super::{Board, Color, Square};

pub(crate) const ROOK_DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(crate) const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const QUEEN_DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl Board {
    /// Walk each ray up to the edge; the first occupied square ends the ray
    /// and is included only when it holds an enemy piece.
    pub(crate) fn generate_sliding_moves(
        &self,
        from: Square,
        color: Color,
        directions: &[(isize, isize)],
    ) -> Vec<Square> {
        let mut moves = Vec::new();
        for &(dr, df) in directions {
            let mut current = from;
            for _ in 0..7 {
                let Some(next) = current.offset(dr, df) else {
                    break;
                };
                match self.color_at(next) {
                    None => moves.push(next),
                    Some(other) => {
                        if other != color {
                            moves.push(next);
                        }
                        break;
                    }
                }
                current = next;
            }
        }
        moves
    }

    /// First occupied square along a ray, if any.
    pub(crate) fn first_along(&self, from: Square, dr: isize, df: isize) -> Option<Square> {
        let mut current = from;
        while let Some(next) = current.offset(dr, df) {
            if !self.is_empty(next) {
                return Some(next);
            }
            current = next;
        }
        None
    }
}

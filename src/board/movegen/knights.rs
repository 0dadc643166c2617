use super::super::{Board, Color, Square};

pub(crate) const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

impl Board {
    pub(crate) fn generate_knight_moves(&self, from: Square, color: Color) -> Vec<Square> {
        self.step_targets(from, color, &KNIGHT_OFFSETS)
    }

    /// Single-step targets for leapers: stop only on own pieces.
    pub(crate) fn step_targets(
        &self,
        from: Square,
        color: Color,
        offsets: &[(isize, isize)],
    ) -> Vec<Square> {
        offsets
            .iter()
            .filter_map(|&(dr, df)| from.offset(dr, df))
            .filter(|&sq| self.color_at(sq) != Some(color))
            .collect()
    }
}

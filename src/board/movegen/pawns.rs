use super::super::{Board, Color, Position, Square};

impl Position {
    pub(crate) fn generate_pawn_moves(&self, from: Square, color: Color) -> Vec<Square> {
        let mut moves = Vec::new();
        let dir = color.pawn_direction();

        if let Some(one) = from.offset(dir, 0) {
            if self.board.is_empty(one) {
                moves.push(one);
                if from.rank() == color.pawn_start_rank() {
                    if let Some(two) = one.offset(dir, 0) {
                        if self.board.is_empty(two) {
                            moves.push(two);
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(target) = from.offset(dir, df) else {
                continue;
            };
            match self.board.color_at(target) {
                Some(target_color) if target_color != color => moves.push(target),
                None if self.en_passant_allowed(from, target, color) => moves.push(target),
                _ => {}
            }
        }

        moves
    }

    /// The previous move must be an enemy pawn's double step that landed
    /// beside `from` on the file being captured towards.
    fn en_passant_allowed(&self, from: Square, target: Square, color: Color) -> bool {
        self.last_move.as_ref().is_some_and(|last| {
            last.piece.color != color
                && last.is_double_pawn_step()
                && last.to == Square(from.rank(), target.file())
        })
    }
}

impl Board {
    /// Diagonal squares a pawn threatens, whether or not they hold a victim.
    pub(crate) fn pawn_attacks(&self, from: Square, color: Color) -> Vec<Square> {
        [-1, 1]
            .into_iter()
            .filter_map(|df| from.offset(color.pawn_direction(), df))
            .filter(|&sq| self.color_at(sq) != Some(color))
            .collect()
    }
}

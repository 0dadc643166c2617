//! Candidate move generation.
//!
//! Candidates are geometrically possible moves that ignore whether the
//! mover's own king is left attacked; [`super::legality`] filters them.

mod kings;
mod knights;
mod pawns;
mod sliders;

pub(crate) use sliders::{BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};

use super::{Board, Color, Piece, Position, Square, SquareSet};

impl Position {
    /// Candidate targets for the piece on `from`, including raw castling and
    /// en passant targets. Empty when the square is empty.
    #[must_use]
    pub fn candidate_moves(&self, from: Square) -> Vec<Square> {
        let Some(info) = self.board.info_at(from) else {
            return Vec::new();
        };
        let color = info.color;
        match info.effective() {
            Piece::Pawn => self.generate_pawn_moves(from, color),
            Piece::Knight => self.board.generate_knight_moves(from, color),
            Piece::Bishop => self
                .board
                .generate_sliding_moves(from, color, &BISHOP_DIRECTIONS),
            Piece::Rook => self
                .board
                .generate_sliding_moves(from, color, &ROOK_DIRECTIONS),
            Piece::Queen => self
                .board
                .generate_sliding_moves(from, color, &QUEEN_DIRECTIONS),
            Piece::King => self.generate_king_moves(from, color),
        }
    }
}

impl Board {
    /// Squares the piece on `from` threatens.
    ///
    /// Same as its candidates except that pawns threaten both diagonals and
    /// never their push squares, and neither castling nor en passant counts.
    #[must_use]
    pub fn attacks_from(&self, from: Square) -> Vec<Square> {
        let Some(info) = self.info_at(from) else {
            return Vec::new();
        };
        let color = info.color;
        match info.effective() {
            Piece::Pawn => self.pawn_attacks(from, color),
            Piece::Knight => self.generate_knight_moves(from, color),
            Piece::Bishop => self.generate_sliding_moves(from, color, &BISHOP_DIRECTIONS),
            Piece::Rook => self.generate_sliding_moves(from, color, &ROOK_DIRECTIONS),
            Piece::Queen => self.generate_sliding_moves(from, color, &QUEEN_DIRECTIONS),
            Piece::King => self.step_targets(from, color, &kings::KING_OFFSETS),
        }
    }

    /// Union of every `color` piece's threatened squares.
    #[must_use]
    pub fn attacked_by(&self, color: Color) -> SquareSet {
        self.occupied_by(color)
            .flat_map(|(sq, _)| self.attacks_from(sq))
            .collect()
    }
}

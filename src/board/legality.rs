//! Legality filtering and king status.
//!
//! Every candidate is played on a throwaway copy of the board; it survives
//! only if the mover's king is not attacked afterwards. Castling is also
//! refused when the king starts on, or passes over, an attacked square.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{CastleSide, Color, Piece, PieceId, Position, Square};

/// Legal targets per piece for one color.
pub type LegalMoves = BTreeMap<PieceId, Vec<Square>>;

/// Where a king stands and whether it is in trouble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KingStatus {
    pub square: Square,
    pub in_check: bool,
    pub in_checkmate: bool,
}

impl Position {
    fn expect_king(&self, color: Color) -> Square {
        match self.board.king_square(color) {
            Some(sq) => sq,
            None => panic!("{color} king missing from the board"),
        }
    }

    /// Candidates of the piece on `from` that do not expose its own king.
    #[must_use]
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        let Some(info) = self.board.info_at(from) else {
            return Vec::new();
        };
        let color = info.color;
        let opponent = color.opponent();
        let is_king = info.effective() == Piece::King;

        self.candidate_moves(from)
            .into_iter()
            .filter(|&to| {
                if is_king && CastleSide::from_king_move(from, to).is_some() {
                    let transit = Square(from.rank(), (from.file() + to.file()) / 2);
                    if self.board.is_square_attacked(from, opponent)
                        || self.board.is_square_attacked(transit, opponent)
                    {
                        return false;
                    }
                }
                let mut probe = self.board.clone();
                probe.play(from, to, Piece::Queen);
                match probe.king_square(color) {
                    Some(king) => !probe.is_square_attacked(king, opponent),
                    None => panic!("{color} king vanished while probing {from}{to}"),
                }
            })
            .collect()
    }

    /// Legal targets for every `color` piece on the board, including pieces
    /// with no legal move.
    #[must_use]
    pub fn legal_moves(&self, color: Color) -> LegalMoves {
        self.board
            .occupied_by(color)
            .map(|(sq, id)| (id, self.legal_targets(sq)))
            .collect()
    }

    /// Whether `color` has at least one legal move.
    #[must_use]
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.board
            .occupied_by(color)
            .any(|(sq, _)| !self.legal_targets(sq).is_empty())
    }

    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        let king = self.expect_king(color);
        self.board.is_square_attacked(king, color.opponent())
    }

    /// King square, check and checkmate for `color`.
    #[must_use]
    pub fn king_status(&self, color: Color, legal: &LegalMoves) -> KingStatus {
        let square = self.expect_king(color);
        let in_check = self.board.is_square_attacked(square, color.opponent());
        let no_moves = legal.values().all(Vec::is_empty);
        KingStatus {
            square,
            in_check,
            in_checkmate: in_check && no_moves,
        }
    }

    /// Side to move is checkmated.
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check(self.turn) && !self.has_legal_move(self.turn)
    }

    /// Side to move is not in check but cannot move.
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check(self.turn) && !self.has_legal_move(self.turn)
    }

    /// Count leaf positions `depth` plies deep. Promotions count once since
    /// they are auto-assigned.
    #[must_use]
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves: Vec<(Square, Square)> = self
            .board
            .occupied_by(self.turn)
            .flat_map(|(from, _)| self.legal_targets(from).into_iter().map(move |to| (from, to)))
            .collect();
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .into_iter()
            .map(|(from, to)| {
                let mut next = self.clone();
                next.play(from, to, Piece::Queen);
                next.perft(depth - 1)
            })
            .sum()
    }
}

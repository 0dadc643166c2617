//! Immutable-style game snapshots.
//!
//! A `GameState` is never changed once it is stored in the tree; applying a
//! move clones the snapshot and returns the new one.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;

use super::annotations::Annotations;
use crate::board::{
    Board, Color, FenError, KingStatus, LastMove, LegalMoves, MoveError, MoveRecord, NodeKey,
    Piece, PieceId, PieceInfo, Position, Square,
};
use crate::notation;

static STANDARD_START: Lazy<GameState> =
    Lazy::new(|| GameState::from_position(Position::standard(), 0, 0));

/// One position in a game together with everything derived from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    position: Position,
    /// captured[c] holds the pieces color `c` has taken.
    captured: [Vec<PieceId>; 2],
    legal_moves: [LegalMoves; 2],
    kings: [KingStatus; 2],
    stalemate: bool,
    moves: Vec<MoveRecord>,
    annotations: Annotations,
    notation: Option<String>,
    key: Option<NodeKey>,
    halfmove_clock: u32,
    ply: u32,
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl GameState {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        STANDARD_START.clone()
    }

    /// A starting snapshot from a FEN record.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let setup = Position::try_from_fen(fen)?;
        Ok(GameState::from_position(
            setup.position,
            setup.halfmove_clock,
            setup.ply,
        ))
    }

    pub(crate) fn from_position(position: Position, halfmove_clock: u32, ply: u32) -> Self {
        let mut state = GameState {
            position,
            captured: [Vec::new(), Vec::new()],
            legal_moves: [LegalMoves::new(), LegalMoves::new()],
            kings: [KingStatus {
                square: Square(0, 0),
                in_check: false,
                in_checkmate: false,
            }; 2],
            stalemate: false,
            moves: Vec::new(),
            annotations: Annotations::default(),
            notation: None,
            key: None,
            halfmove_clock,
            ply,
        };
        state.refresh();
        state
    }

    /// Regenerate legal moves, king status and the stalemate flag.
    fn refresh(&mut self) {
        for color in Color::BOTH {
            self.legal_moves[color.index()] = self.position.legal_moves(color);
        }
        for color in Color::BOTH {
            self.kings[color.index()] = self
                .position
                .king_status(color, &self.legal_moves[color.index()]);
        }
        let turn = self.position.turn();
        let to_move = &self.kings[turn.index()];
        self.stalemate = !to_move.in_check
            && self.legal_moves[turn.index()].values().all(Vec::is_empty);
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        self.position.to_fen(self.halfmove_clock, self.ply)
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    #[must_use]
    pub fn board(&self) -> &Board {
        self.position.board()
    }

    #[inline]
    #[must_use]
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Sparse square → piece view of the board.
    #[must_use]
    pub fn squares(&self) -> BTreeMap<Square, PieceId> {
        self.board().occupied().collect()
    }

    /// Every piece on the board with its derived info.
    #[must_use]
    pub fn pieces(&self) -> BTreeMap<PieceId, PieceInfo> {
        self.board().pieces()
    }

    /// Pieces `color` has captured, in capture order.
    #[must_use]
    pub fn captured(&self, color: Color) -> &[PieceId] {
        &self.captured[color.index()]
    }

    #[must_use]
    pub fn moved(&self) -> &BTreeSet<PieceId> {
        self.position.moved()
    }

    #[must_use]
    pub fn legal_moves(&self, color: Color) -> &LegalMoves {
        &self.legal_moves[color.index()]
    }

    /// Legal targets of the piece on `from`, empty for an empty square.
    #[must_use]
    pub fn legal_targets(&self, from: Square) -> &[Square] {
        self.board()
            .piece_at(from)
            .and_then(|id| self.legal_moves[id.color.index()].get(&id))
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn king_status(&self, color: Color) -> KingStatus {
        self.kings[color.index()]
    }

    #[must_use]
    pub fn is_check(&self) -> bool {
        self.kings[self.turn().index()].in_check
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.kings[self.turn().index()].in_checkmate
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_stalemate()
    }

    #[must_use]
    pub fn last_move(&self) -> Option<&LastMove> {
        self.position.last_move()
    }

    /// Moves played from the starting snapshot to this one.
    #[must_use]
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    #[must_use]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub(crate) fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    /// SAN of the move that produced this state.
    #[must_use]
    pub fn notation(&self) -> Option<&str> {
        self.notation.as_deref()
    }

    /// Identity of the move that produced this state; `None` at the start.
    #[must_use]
    pub fn key(&self) -> Option<NodeKey> {
        self.key
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Plies played before this state, counting any FEN offset.
    #[must_use]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.ply / 2 + 1
    }

    /// Check that `from` → `to` is playable, returning the mover.
    pub fn validate_move(&self, from: Square, to: Square) -> Result<PieceId, MoveError> {
        for square in [from, to] {
            if !square.is_on_board() {
                return Err(MoveError::OffBoard { square });
            }
        }
        let id = self
            .board()
            .piece_at(from)
            .ok_or(MoveError::EmptySource { square: from })?;
        if id.color != self.turn() {
            return Err(MoveError::WrongTurn {
                square: from,
                color: id.color,
            });
        }
        if !self.legal_targets(from).contains(&to) {
            return Err(MoveError::IllegalTarget { from, to });
        }
        Ok(id)
    }

    /// Clone this snapshot and play `from` → `to` on the copy.
    ///
    /// A pawn reaching its last rank becomes `promotion`. Nothing is touched
    /// when the move is rejected.
    pub fn apply_move(
        &self,
        from: Square,
        to: Square,
        promotion: Piece,
    ) -> Result<GameState, MoveError> {
        let mover = self.validate_move(from, to)?;
        if !promotion.is_promotion_target() {
            return Err(MoveError::InvalidPromotion { from, to });
        }

        let mut next = self.clone();
        let last = next.position.play(from, to, promotion);
        if let Some(victim) = last.captured {
            next.captured[mover.color.index()].push(victim);
        }
        next.halfmove_clock = if last.moved_as == Piece::Pawn || last.is_capture() {
            0
        } else {
            self.halfmove_clock + 1
        };
        next.ply = self.ply + 1;
        next.moves.push(MoveRecord::new(from, to, last.promotion));
        next.annotations = Annotations::default();
        next.key = Some(NodeKey::new(from, to));
        next.refresh();
        next.notation = Some(notation::encode_move(self, &next));

        trace_log!(
            trace,
            "{} played {} ({})",
            mover,
            NodeKey::new(from, to),
            next.notation.as_deref().unwrap_or_default()
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn play(state: &GameState, from: &str, to: &str) -> GameState {
        state.apply_move(sq(from), sq(to), Piece::Queen).unwrap()
    }

    #[test]
    fn test_start_state() {
        let state = GameState::new();
        assert_eq!(state.turn(), Color::White);
        assert_eq!(state.squares().len(), 32);
        assert_eq!(state.pieces().len(), 32);
        assert_eq!(
            state
                .legal_moves(Color::White)
                .values()
                .map(Vec::len)
                .sum::<usize>(),
            20
        );
        assert_eq!(state.king_status(Color::Black).square, sq("e8"));
        assert!(!state.is_game_over());
        assert_eq!(state.key(), None);
        assert_eq!(state.notation(), None);
    }

    #[test]
    fn test_apply_move_leaves_original_untouched() {
        let start = GameState::new();
        let next = play(&start, "e2", "e4");
        assert!(start.board().piece_at(sq("e2")).is_some());
        assert!(next.board().piece_at(sq("e2")).is_none());
        assert_eq!(next.turn(), Color::Black);
        assert_eq!(next.key(), Some(NodeKey::new(sq("e2"), sq("e4"))));
        assert_eq!(next.notation(), Some("e4"));
        assert_eq!(next.moves().len(), 1);
        assert_eq!(next.fullmove_number(), 1);
        assert!(next
            .moved()
            .contains(&PieceId::new(Color::White, Piece::Pawn, 4)));
    }

    #[test]
    fn test_rejections() {
        let start = GameState::new();
        assert_eq!(
            start.apply_move(sq("e4"), sq("e5"), Piece::Queen),
            Err(MoveError::EmptySource { square: sq("e4") })
        );
        assert_eq!(
            start.apply_move(sq("e7"), sq("e5"), Piece::Queen),
            Err(MoveError::WrongTurn {
                square: sq("e7"),
                color: Color::Black
            })
        );
        assert_eq!(
            start.apply_move(sq("e2"), sq("e5"), Piece::Queen),
            Err(MoveError::IllegalTarget {
                from: sq("e2"),
                to: sq("e5")
            })
        );
        assert_eq!(
            start.apply_move(Square(8, 4), sq("e4"), Piece::Queen),
            Err(MoveError::OffBoard {
                square: Square(8, 4)
            })
        );
        assert_eq!(
            start.apply_move(sq("e2"), Square(3, 9), Piece::Queen),
            Err(MoveError::OffBoard {
                square: Square(3, 9)
            })
        );
        assert!(start.legal_targets(Square(8, 4)).is_empty());
        assert_eq!(
            start.apply_move(sq("e2"), sq("e4"), Piece::King),
            Err(MoveError::InvalidPromotion {
                from: sq("e2"),
                to: sq("e4")
            })
        );
    }

    #[test]
    fn test_capture_is_recorded_for_capturer() {
        let mut state = GameState::new();
        for (from, to) in [("e2", "e4"), ("d7", "d5"), ("e4", "d5")] {
            state = play(&state, from, to);
        }
        assert_eq!(
            state.captured(Color::White),
            &[PieceId::new(Color::Black, Piece::Pawn, 3)]
        );
        assert!(state.captured(Color::Black).is_empty());
        assert_eq!(state.halfmove_clock(), 0);
        assert_eq!(state.notation(), Some("exd5"));
    }

    #[test]
    fn test_fools_mate() {
        let mut state = GameState::new();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            state = play(&state, from, to);
        }
        let white = state.king_status(Color::White);
        assert!(white.in_check);
        assert!(white.in_checkmate);
        assert!(state.legal_moves(Color::White).values().all(Vec::is_empty));
        assert!(state.is_game_over());
        assert!(!state.is_stalemate());
        assert_eq!(state.notation(), Some("Qh4#"));
    }

    #[test]
    fn test_fen_state_round_trip() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 20";
        let state = GameState::from_fen(fen).unwrap();
        assert_eq!(state.to_fen(), fen);
        assert!(state.legal_targets(sq("e1")).contains(&sq("g1")));
    }
}

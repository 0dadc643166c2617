//! Move records and tree edge keys.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::{Piece, PieceId};
use super::square::Square;
use crate::board::error::MoveParseError;

/// Which wing a castling move goes to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    /// File the rook starts on.
    #[inline]
    #[must_use]
    pub(crate) const fn rook_file(self) -> usize {
        match self {
            CastleSide::King => 7,
            CastleSide::Queen => 0,
        }
    }

    /// File the king lands on.
    #[inline]
    #[must_use]
    pub(crate) const fn king_target_file(self) -> usize {
        match self {
            CastleSide::King => 6,
            CastleSide::Queen => 2,
        }
    }

    /// File the rook lands on.
    #[inline]
    #[must_use]
    pub(crate) const fn rook_target_file(self) -> usize {
        match self {
            CastleSide::King => 5,
            CastleSide::Queen => 3,
        }
    }

    /// Castling side implied by a king move, if it spans two files.
    #[must_use]
    pub(crate) fn from_king_move(from: Square, to: Square) -> Option<Self> {
        if from.rank() != to.rank() {
            return None;
        }
        match to.file() as isize - from.file() as isize {
            2 => Some(CastleSide::King),
            -2 => Some(CastleSide::Queen),
            _ => None,
        }
    }
}

/// Identity of a tree edge: the source and target squares of the move.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeKey {
    pub from: Square,
    pub to: Square,
}

impl NodeKey {
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        NodeKey { from, to }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for NodeKey {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record: MoveRecord = s.parse()?;
        Ok(record.key())
    }
}

/// One entry of a state's move list.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl MoveRecord {
    #[must_use]
    pub const fn new(from: Square, to: Square, promotion: Option<Piece>) -> Self {
        MoveRecord {
            from,
            to,
            promotion,
        }
    }

    #[must_use]
    pub const fn key(&self) -> NodeKey {
        NodeKey::new(self.from, self.to)
    }
}

/// Coordinate text such as `e2e4` or `e7e8q`.
impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for MoveRecord {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(MoveParseError::InvalidLength { len: s.len() });
        }
        let invalid = || MoveParseError::InvalidSquare {
            notation: s.to_string(),
        };
        let from: Square = s[0..2].parse().map_err(|_| invalid())?;
        let to: Square = s[2..4].parse().map_err(|_| invalid())?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(p) if p.is_promotion_target() => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };
        Ok(MoveRecord::new(from, to, promotion))
    }
}

/// What the move that produced a state did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LastMove {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    pub captured: Option<PieceId>,
    pub en_passant: bool,
    pub castle: Option<CastleSide>,
    pub promotion: Option<Piece>,
    /// Effective type of the mover before the move.
    pub moved_as: Piece,
}

impl LastMove {
    #[inline]
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// A pawn advancing two ranks, the precondition for en passant.
    #[inline]
    #[must_use]
    pub fn is_double_pawn_step(&self) -> bool {
        matches!(self.moved_as, Piece::Pawn) && self.from.rank().abs_diff(self.to.rank()) == 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_record_text() {
        let mv: MoveRecord = "e7e8q".parse().unwrap();
        assert_eq!(mv.from, Square(6, 4));
        assert_eq!(mv.to, Square(7, 4));
        assert_eq!(mv.promotion, Some(Piece::Queen));
        assert_eq!(mv.to_string(), "e7e8q");
        assert_eq!(mv.key().to_string(), "e7e8");
    }

    #[test]
    fn test_move_record_rejects_garbage() {
        assert_eq!(
            "e2".parse::<MoveRecord>(),
            Err(MoveParseError::InvalidLength { len: 2 })
        );
        assert!("z2e4".parse::<MoveRecord>().is_err());
        assert_eq!(
            "e7e8k".parse::<MoveRecord>(),
            Err(MoveParseError::InvalidPromotion { char: 'k' })
        );
    }

    #[test]
    fn test_castle_side_from_king_move() {
        assert_eq!(
            CastleSide::from_king_move(Square(0, 4), Square(0, 6)),
            Some(CastleSide::King)
        );
        assert_eq!(
            CastleSide::from_king_move(Square(7, 4), Square(7, 2)),
            Some(CastleSide::Queen)
        );
        assert_eq!(CastleSide::from_king_move(Square(0, 4), Square(0, 5)), None);
    }
}

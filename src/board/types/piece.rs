//! Piece, color and piece identity types.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::PieceIdError;

/// Chess piece types.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// All piece types in index order
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Piece::Pawn => 0,
            Piece::Knight => 1,
            Piece::Bishop => 2,
            Piece::Rook => 3,
            Piece::Queen => 4,
            Piece::King => 5,
        }
    }

    /// Parse a piece from a character, ignoring case (p, n, b, r, q, k)
    #[must_use]
    pub fn from_char(c: char) -> Option<Piece> {
        match c.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }

    /// Convert piece to lowercase character
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    /// Convert piece to character with case based on color (uppercase for White)
    #[inline]
    #[must_use]
    pub fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        if color == Color::White {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Whether a pawn may promote to this piece.
    #[inline]
    #[must_use]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen
        )
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Piece::Pawn => "pawn",
            Piece::Knight => "knight",
            Piece::Bishop => "bishop",
            Piece::Rook => "rook",
            Piece::Queen => "queen",
            Piece::King => "king",
        };
        f.write_str(name)
    }
}

/// Chess colors.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colors in index order (White=0, Black=1)
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Returns the opposite color
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Back rank for this color (0 for White, 7 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn back_rank(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Pawn forward direction (+1 for White, -1 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_direction(self) -> isize {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Pawn starting rank (1 for White, 6 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_start_rank(self) -> usize {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Pawn promotion rank (7 for White, 0 for Black)
    #[inline]
    #[must_use]
    pub(crate) const fn pawn_promotion_rank(self) -> usize {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn to_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// Stable identity of one physical piece.
///
/// `kind` is the type the piece started the game as; a promoted pawn keeps
/// its id and reports its new type through [`PieceInfo`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PieceId {
    pub color: Color,
    pub kind: Piece,
    pub instance: u8,
}

impl PieceId {
    #[must_use]
    pub const fn new(color: Color, kind: Piece, instance: u8) -> Self {
        PieceId {
            color,
            kind,
            instance,
        }
    }
}

/// Formats as color letter, uppercase piece letter and instance: `wP4`, `bK0`.
impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.color.to_char(),
            self.kind.to_char().to_ascii_uppercase(),
            self.instance
        )
    }
}

impl FromStr for PieceId {
    type Err = PieceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PieceIdError {
            notation: s.to_string(),
        };
        let mut chars = s.chars();
        let color = match chars.next() {
            Some('w') => Color::White,
            Some('b') => Color::Black,
            _ => return Err(invalid()),
        };
        let kind = chars
            .next()
            .filter(char::is_ascii_uppercase)
            .and_then(Piece::from_char)
            .ok_or_else(invalid)?;
        let instance = chars.as_str().parse::<u8>().map_err(|_| invalid())?;
        Ok(PieceId::new(color, kind, instance))
    }
}

/// Derived view of a [`PieceId`] on a particular board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PieceInfo {
    pub color: Color,
    pub kind: Piece,
    pub promoted: Option<Piece>,
}

impl PieceInfo {
    /// The type the piece currently moves as.
    #[inline]
    #[must_use]
    pub fn effective(&self) -> Piece {
        self.promoted.unwrap_or(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_id_text() {
        let id = PieceId::new(Color::White, Piece::Pawn, 4);
        assert_eq!(id.to_string(), "wP4");
        assert_eq!("wP4".parse::<PieceId>().unwrap(), id);
        assert_eq!(
            "bK0".parse::<PieceId>().unwrap(),
            PieceId::new(Color::Black, Piece::King, 0)
        );
        assert!("xP1".parse::<PieceId>().is_err());
        assert!("wp1".parse::<PieceId>().is_err());
        assert!("wP".parse::<PieceId>().is_err());
    }

    #[test]
    fn test_effective_kind_follows_promotion() {
        let info = PieceInfo {
            color: Color::Black,
            kind: Piece::Pawn,
            promoted: Some(Piece::Knight),
        };
        assert_eq!(info.effective(), Piece::Knight);
    }
}

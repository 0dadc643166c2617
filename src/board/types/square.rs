//! Square types and utilities.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareError;

pub(crate) fn file_to_index(file: char) -> Option<usize> {
    match file {
        'a'..='h' => Some(file as usize - 'a' as usize),
        _ => None,
    }
}

pub(crate) fn rank_to_index(rank: char) -> Option<usize> {
    match rank {
        '1'..='8' => Some(rank as usize - '1' as usize),
        _ => None,
    }
}

pub(crate) fn file_char(file: usize) -> char {
    (b'a' + file as u8) as char
}

pub(crate) fn rank_char(rank: usize) -> char {
    (b'1' + rank as u8) as char
}

/// A square on the chess board, represented as (rank, file).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(pub usize, pub usize); // (rank, file)

impl Square {
    /// Every square in index order (a1, b1, ..., h8).
    pub const ALL: [Square; 64] = {
        let mut all = [Square(0, 0); 64];
        let mut idx = 0;
        while idx < 64 {
            all[idx] = Square(idx / 8, idx % 8);
            idx += 1;
        }
        all
    };

    /// Create a new square with bounds checking
    #[must_use]
    pub fn new(rank: usize, file: usize) -> Option<Self> {
        if rank < 8 && file < 8 {
            Some(Square(rank, file))
        } else {
            None
        }
    }

    /// Whether both coordinates lie on the board.
    #[inline]
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        self.0 < 8 && self.1 < 8
    }

    /// Get the rank (0-7, where 0 = rank 1)
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        self.0
    }

    /// Get the file (0-7, where 0 = file a)
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        self.1
    }

    /// Get the square's index (0-63, a1=0, b1=1, ..., h8=63)
    #[inline]
    #[must_use]
    pub const fn as_index(self) -> usize {
        self.0 * 8 + self.1
    }

    /// Create a square from an index (0-63)
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        Square(idx / 8, idx % 8)
    }

    /// Step by a (rank, file) delta, returning `None` when leaving the board.
    #[inline]
    #[must_use]
    pub fn offset(self, d_rank: isize, d_file: isize) -> Option<Self> {
        let rank = self.0 as isize + d_rank;
        let file = self.1 as isize + d_file;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square(rank as usize, file as usize))
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", file_char(self.1), rank_char(self.0))
    }
}

impl PartialOrd for Square {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Square {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_index().cmp(&other.as_index())
    }
}

impl TryFrom<(usize, usize)> for Square {
    type Error = SquareError;

    fn try_from((rank, file): (usize, usize)) -> Result<Self, Self::Error> {
        if rank >= 8 {
            return Err(SquareError::RankOutOfBounds { rank });
        }
        if file >= 8 {
            return Err(SquareError::FileOutOfBounds { file });
        }
        Ok(Square(rank, file))
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SquareError::InvalidNotation {
            notation: s.to_string(),
        };
        let mut chars = s.chars();
        let (Some(f), Some(r), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let file = file_to_index(f).ok_or_else(invalid)?;
        let rank = rank_to_index(r).ok_or_else(invalid)?;
        Ok(Square(rank, file))
    }
}

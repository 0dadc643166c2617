//! Error types for board, move and position operations.

use std::fmt;

use super::{Color, Square};

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4)
    TooFewParts { found: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// Invalid rank in position string
    InvalidRank { rank: usize },
    /// Too many files in a rank
    TooManyFiles { rank: usize, files: usize },
    /// Each side needs exactly one king
    KingCount { color: Color, found: usize },
    /// Too many pieces of one type to number them
    TooManyPieces { color: Color },
    /// The side not on move is already in check
    OpponentInCheck { color: Color },
    /// Fullmove number does not fit the ply counter
    InvalidFullmove { found: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::InvalidRank { rank } => {
                write!(f, "Invalid rank index {rank} in FEN")
            }
            FenError::TooManyFiles { rank, files } => {
                write!(f, "Too many files ({files}) in rank {rank}")
            }
            FenError::KingCount { color, found } => {
                write!(f, "{color} must have exactly one king, found {found}")
            }
            FenError::TooManyPieces { color } => {
                write!(f, "Too many pieces for {color}")
            }
            FenError::OpponentInCheck { color } => {
                write!(f, "{color} is in check but not on move")
            }
            FenError::InvalidFullmove { found } => {
                write!(f, "Invalid fullmove number '{found}'")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for coordinate move text such as `e7e8q`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    InvalidLength { len: usize },
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    InvalidPromotion { char: char },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-7)
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Error type for piece identity text such as `wP4`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceIdError {
    pub notation: String,
}

impl fmt::Display for PieceIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid piece id '{}'", self.notation)
    }
}

impl std::error::Error for PieceIdError {}

/// A move rejected before any state was touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// A square outside the 8x8 board
    OffBoard { square: Square },
    /// Nothing stands on the source square
    EmptySource { square: Square },
    /// The piece on the source square belongs to the side not on move
    WrongTurn { square: Square, color: Color },
    /// The target is not among the piece's legal moves
    IllegalTarget { from: Square, to: Square },
    /// Requested promotion type is not a knight, bishop, rook or queen
    InvalidPromotion { from: Square, to: Square },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OffBoard { square } => {
                write!(f, "Square ({}, {}) is off the board", square.rank(), square.file())
            }
            MoveError::EmptySource { square } => {
                write!(f, "No piece on {square}")
            }
            MoveError::WrongTurn { square, color } => {
                write!(f, "Piece on {square} belongs to {color}, who is not on move")
            }
            MoveError::IllegalTarget { from, to } => {
                write!(f, "Illegal move {from}{to}")
            }
            MoveError::InvalidPromotion { from, to } => {
                write!(f, "Invalid promotion on {from}{to}")
            }
        }
    }
}

impl std::error::Error for MoveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_error_too_few_parts() {
        let err = FenError::TooFewParts { found: 2 };
        assert!(err.to_string().contains('2'));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_fen_error_king_count() {
        let err = FenError::KingCount {
            color: Color::Black,
            found: 0,
        };
        assert!(err.to_string().contains("Black"));
    }

    #[test]
    fn test_move_error_mentions_squares() {
        let err = MoveError::IllegalTarget {
            from: Square(1, 4),
            to: Square(4, 4),
        };
        assert!(err.to_string().contains("e2e5"));
        let err = MoveError::EmptySource {
            square: Square(3, 3),
        };
        assert!(err.to_string().contains("d4"));
    }

    #[test]
    fn test_square_error_invalid_notation() {
        let err = SquareError::InvalidNotation {
            notation: "xyz".to_string(),
        };
        assert!(err.to_string().contains("xyz"));
    }

    #[test]
    fn test_error_clone() {
        let err = FenError::InvalidPiece { char: 'x' };
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}

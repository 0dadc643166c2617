//! Error types for SAN resolution, PGN parsing and import.

use std::fmt;

use crate::board::MoveError;

/// Error type for SAN resolution failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    /// Empty SAN string
    Empty,
    /// Invalid piece character
    InvalidPiece { char: char },
    /// Invalid square in SAN
    InvalidSquare { notation: String },
    /// More than one legal move matches
    AmbiguousMove { san: String },
    /// No legal move matches
    NoMatchingMove { san: String },
    /// Invalid promotion piece
    InvalidPromotion { char: char },
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanError::Empty => write!(f, "Empty SAN string"),
            SanError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in SAN")
            }
            SanError::InvalidSquare { notation } => {
                write!(f, "Invalid square in SAN '{notation}'")
            }
            SanError::AmbiguousMove { san } => {
                write!(f, "Ambiguous move '{san}'")
            }
            SanError::NoMatchingMove { san } => {
                write!(f, "No legal move matches '{san}'")
            }
            SanError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
        }
    }
}

impl std::error::Error for SanError {}

/// Movetext that does not follow the expected token order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// A token arrived where the parser expected something else
    UnexpectedToken {
        index: usize,
        token: String,
        expected: &'static str,
    },
    /// Input ended in the middle of a move pair
    UnexpectedEnd { expected: &'static str },
    /// A move number out of sequence
    WrongMoveNumber { expected: u32, found: u32 },
    /// `{` without a matching `}`
    UnterminatedComment,
    /// Header line that is not `[Key "Value"]`
    MalformedHeader { line: String },
    /// `%csl` / `%cal` entry that does not name a color and squares
    InvalidAnnotation { text: String },
    /// Recursive annotation variations are not supported
    Variation { index: usize },
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationError::UnexpectedToken {
                index,
                token,
                expected,
            } => {
                write!(f, "Unexpected token '{token}' at {index}, expected {expected}")
            }
            NotationError::UnexpectedEnd { expected } => {
                write!(f, "Notation ended early, expected {expected}")
            }
            NotationError::WrongMoveNumber { expected, found } => {
                write!(f, "Move number {found} out of sequence, expected {expected}")
            }
            NotationError::UnterminatedComment => write!(f, "Unterminated comment"),
            NotationError::MalformedHeader { line } => {
                write!(f, "Malformed header '{line}'")
            }
            NotationError::InvalidAnnotation { text } => {
                write!(f, "Invalid annotation '{text}'")
            }
            NotationError::Variation { index } => {
                write!(f, "Variations are not supported (token {index})")
            }
        }
    }
}

impl std::error::Error for NotationError {}

/// Why an import was abandoned. Nothing is committed when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    Notation(NotationError),
    /// SAN token `ply` could not be resolved
    San { ply: usize, source: SanError },
    /// SAN token `ply` resolved to a move the game state refused
    Move { ply: usize, source: MoveError },
    /// The FEN header could not be read
    Fen(crate::board::FenError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Notation(err) => write!(f, "{err}"),
            ImportError::San { ply, source } => write!(f, "Ply {ply}: {source}"),
            ImportError::Move { ply, source } => write!(f, "Ply {ply}: {source}"),
            ImportError::Fen(err) => write!(f, "FEN header: {err}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Notation(err) => Some(err),
            ImportError::San { source, .. } => Some(source),
            ImportError::Move { source, .. } => Some(source),
            ImportError::Fen(err) => Some(err),
        }
    }
}

impl From<NotationError> for ImportError {
    fn from(err: NotationError) -> Self {
        ImportError::Notation(err)
    }
}

impl From<crate::board::FenError> for ImportError {
    fn from(err: crate::board::FenError) -> Self {
        ImportError::Fen(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_san_error_display() {
        let err = SanError::AmbiguousMove {
            san: "Nd2".to_string(),
        };
        assert!(err.to_string().contains("Nd2"));
    }

    #[test]
    fn test_import_error_keeps_source() {
        use std::error::Error;
        let err = ImportError::San {
            ply: 3,
            source: SanError::Empty,
        };
        assert!(err.to_string().starts_with("Ply 3"));
        assert!(err.source().is_some());
    }
}

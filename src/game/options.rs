//! Controller settings, set by name the way a UCI `setoption` works.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::Piece;

/// Error from [`GameOptions::apply_option`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// No option has this name
    UnknownOption { name: String },
    /// The value does not fit the option's type
    InvalidValue { name: String, value: String },
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionError::UnknownOption { name } => write!(f, "Unknown option '{name}'"),
            OptionError::InvalidValue { name, value } => {
                write!(f, "Invalid value '{value}' for option '{name}'")
            }
        }
    }
}

impl std::error::Error for OptionError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameOptions {
    /// Piece a pawn becomes on the last rank when the move does not say.
    pub promotion_piece: Piece,
    /// Clear the tree before importing instead of merging into it.
    pub import_resets_tree: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        GameOptions {
            promotion_piece: Piece::Queen,
            import_resets_tree: false,
        }
    }
}

impl GameOptions {
    /// One line per option in `setoption` style.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        vec![
            format!(
                "option name Promotion Piece type combo default {} var queen var rook var bishop var knight",
                self.promotion_piece
            ),
            format!(
                "option name Import Resets Tree type check default {}",
                self.import_resets_tree
            ),
        ]
    }

    /// Set an option by case-insensitive name.
    pub fn apply_option(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let invalid = || OptionError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        let normalized = name.trim().to_ascii_lowercase();
        let value = value.trim();
        match normalized.as_str() {
            "promotion piece" | "promotion" => {
                let piece = match value.to_ascii_lowercase().as_str() {
                    "queen" | "q" => Piece::Queen,
                    "rook" | "r" => Piece::Rook,
                    "bishop" | "b" => Piece::Bishop,
                    "knight" | "n" => Piece::Knight,
                    _ => return Err(invalid()),
                };
                self.promotion_piece = piece;
            }
            "import resets tree" => {
                self.import_resets_tree = match value.to_ascii_lowercase().as_str() {
                    "true" | "1" => true,
                    "false" | "0" => false,
                    _ => return Err(invalid()),
                };
            }
            _ => {
                return Err(OptionError::UnknownOption {
                    name: name.to_string(),
                })
            }
        }
        trace_log!(debug, "option {normalized} set to {value}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GameOptions::default();
        assert_eq!(options.promotion_piece, Piece::Queen);
        assert!(!options.import_resets_tree);
        assert_eq!(options.describe().len(), 2);
    }

    #[test]
    fn test_apply_option_case_insensitive() {
        let mut options = GameOptions::default();
        options.apply_option("Promotion Piece", "Knight").unwrap();
        assert_eq!(options.promotion_piece, Piece::Knight);
        options.apply_option("IMPORT RESETS TREE", "true").unwrap();
        assert!(options.import_resets_tree);
    }

    #[test]
    fn test_apply_option_errors() {
        let mut options = GameOptions::default();
        assert_eq!(
            options.apply_option("promotion piece", "king"),
            Err(OptionError::InvalidValue {
                name: "promotion piece".to_string(),
                value: "king".to_string()
            })
        );
        assert!(matches!(
            options.apply_option("hash", "16"),
            Err(OptionError::UnknownOption { .. })
        ));
        assert_eq!(options, GameOptions::default());
    }
}

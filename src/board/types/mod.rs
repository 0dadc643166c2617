//! Core chess types.
//!
//! This module contains the fundamental types used throughout the crate:
//! - `Piece` and `Color` - chess piece types and colors
//! - `PieceId` and `PieceInfo` - stable piece identity and its derived view
//! - `Square` - (rank, file) board coordinate
//! - `SquareSet` - 64-bit square set used for attack maps
//! - `MoveRecord`, `NodeKey` and `LastMove` - move representation

mod moves;
mod piece;
mod square;
mod square_set;

pub use moves::{CastleSide, LastMove, MoveRecord, NodeKey};
pub use piece::{Color, Piece, PieceId, PieceInfo};
pub use square::Square;
pub use square_set::{SquareSet, SquareSetIter};

pub(crate) use square::{file_char, file_to_index, rank_char, rank_to_index};

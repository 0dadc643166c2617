//! Chess board representation and rules.
//!
//! The board tracks which piece identity stands on each square. Move
//! generation produces candidate targets per piece; the legality filter
//! plays each candidate on a throwaway copy and keeps the ones that leave
//! the mover's king safe.
//!
//! # Example
//! ```
//! use chess_tree::board::{Color, Position, Square};
//!
//! let position = Position::standard();
//! let moves = position.legal_moves(Color::White);
//! let total: usize = moves.values().map(Vec::len).sum();
//! assert_eq!(total, 20);
//! assert_eq!(position.legal_targets(Square(0, 6)).len(), 2);
//! ```

mod error;
mod fen;
mod legality;
mod movegen;
mod position;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveError, MoveParseError, PieceIdError, SquareError};
pub use fen::FenSetup;
pub use legality::{KingStatus, LegalMoves};
pub use position::{Board, Position};
pub use types::{
    CastleSide, Color, LastMove, MoveRecord, NodeKey, Piece, PieceId, PieceInfo, Square,
    SquareSet, SquareSetIter,
};

pub(crate) use types::{file_char, file_to_index, rank_char, rank_to_index};

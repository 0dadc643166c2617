//! Algebraic notation: SAN encoding and resolution, PGN tokenizing,
//! parsing and writing.

mod error;
mod pgn;
mod san;
mod tokenizer;

pub use error::{ImportError, NotationError, SanError};
pub use pgn::{parse_notation_text, write_game, GameResult, ParsedGame, ParsedMove, TurnPair};
pub use san::{encode_move, resolve_san, ResolvedMove};
pub use tokenizer::{tokenize, Token};

//! Chess rules with a branching, content-addressed game tree.
//!
//! - [`board`]: board model, move generation, legality and FEN.
//! - [`game`]: immutable-style game snapshots and the controller hosts drive.
//! - [`tree`]: the arena of positions with branch navigation.
//! - [`notation`]: SAN encoding and resolution, PGN parsing and writing.
//! - [`serialize`]: sparse portable form of a tree.
//!
//! # Example
//! ```
//! use chess_tree::game::GameController;
//!
//! let mut game = GameController::new();
//! game.import_notation("1. f3 e5 2. g4 Qh4#").unwrap();
//! assert!(game.is_game_over());
//! assert_eq!(game.current_state().notation(), Some("Qh4#"));
//! ```

#[cfg(feature = "logging")]
macro_rules! trace_log {
    ($level:ident, $($arg:tt)+) => {
        log::$level!($($arg)+)
    };
}

#[cfg(not(feature = "logging"))]
macro_rules! trace_log {
    ($level:ident, $($arg:tt)+) => {{
        if false {
            let _ = format!($($arg)+);
        }
    }};
}

pub mod board;
pub mod game;
pub mod notation;
pub mod serialize;
pub mod tree;
pub mod zobrist;

pub use board::{Color, Piece, Position, Square};
pub use game::{GameController, GameState};
pub use tree::GameTree;

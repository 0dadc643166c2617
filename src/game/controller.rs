//! The game controller: one tree plus the operations a host drives it with.

use super::annotations::AnnotationColor;
use super::options::{GameOptions, OptionError};
use super::state::GameState;
use crate::board::{Color, FenError, MoveError, NodeKey, Piece, Square};
use crate::notation::{
    self, resolve_san, GameResult, ImportError, NotationError, ParsedGame, ParsedMove, TurnPair,
};
use crate::serialize::{deserialize_tree, serialize_tree, PortableTree, SerializeError};
use crate::tree::{GameTree, LineEntry};
use crate::zobrist::NodeId;

/// Owns a [`GameTree`] and applies moves, annotations, imports and
/// navigation to it.
///
/// Every mutation validates first; a rejected call leaves the tree as it
/// was.
#[derive(Clone, Debug, Default)]
pub struct GameController {
    tree: GameTree,
    options: GameOptions,
}

impl GameController {
    #[must_use]
    pub fn new() -> Self {
        GameController::default()
    }

    #[must_use]
    pub fn with_options(options: GameOptions) -> Self {
        GameController {
            tree: GameTree::default(),
            options,
        }
    }

    /// A controller whose root is the FEN position.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(GameController {
            tree: GameTree::new(GameState::from_fen(fen)?),
            options: GameOptions::default(),
        })
    }

    #[must_use]
    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    #[must_use]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        self.options.apply_option(name, value)
    }

    // Queries

    #[must_use]
    pub fn current_state(&self) -> &GameState {
        self.tree.current_state()
    }

    #[must_use]
    pub fn current_line(&self) -> Vec<LineEntry<'_>> {
        self.tree.current_line()
    }

    #[must_use]
    pub fn current_children(&self) -> Vec<&GameState> {
        self.tree.current_children()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.current_state().is_game_over()
    }

    #[must_use]
    pub fn is_current_node_leaf(&self) -> bool {
        self.tree.is_current_node_leaf()
    }

    #[must_use]
    pub fn is_current_node_root(&self) -> bool {
        self.tree.is_current_node_root()
    }

    #[must_use]
    pub fn is_current_node_sibling(&self) -> bool {
        self.tree.is_current_node_sibling()
    }

    // Mutation

    /// Play `from` → `to`, promoting to the configured piece.
    pub fn on_move(&mut self, from: Square, to: Square) -> Result<NodeId, MoveError> {
        self.on_move_with_promotion(from, to, self.options.promotion_piece)
    }

    /// Play `from` → `to`; a pawn reaching the last rank becomes `promotion`.
    pub fn on_move_with_promotion(
        &mut self,
        from: Square,
        to: Square,
        promotion: Piece,
    ) -> Result<NodeId, MoveError> {
        match self.current_state().apply_move(from, to, promotion) {
            Ok(next) => Ok(self.tree.add_child(next)),
            Err(err) => {
                trace_log!(debug, "rejected move {from}{to}: {err}");
                Err(err)
            }
        }
    }

    /// Toggle a square mark on the current node. Returns true when added.
    pub fn on_mark(&mut self, square: Square, color: AnnotationColor) -> bool {
        self.tree
            .current_state_mut()
            .annotations_mut()
            .toggle_mark(square, color)
    }

    /// Toggle an arrow on the current node. Returns true when added.
    pub fn on_arrow(&mut self, from: Square, to: Square, color: AnnotationColor) -> bool {
        self.tree
            .current_state_mut()
            .annotations_mut()
            .toggle_arrow(from, to, color)
    }

    pub fn on_comment(&mut self, text: impl Into<String>) {
        self.tree.current_state_mut().annotations_mut().add_comment(text);
    }

    /// Drop every move, keeping the starting position.
    pub fn reset(&mut self) {
        self.tree.reset();
    }

    // Navigation

    pub fn select_first(&mut self) -> bool {
        self.tree.select_first()
    }

    pub fn select_last(&mut self) -> bool {
        self.tree.select_last()
    }

    pub fn select_previous(&mut self) -> bool {
        self.tree.select_previous()
    }

    pub fn select_next(&mut self) -> bool {
        self.tree.select_next()
    }

    pub fn select_next_sibling(&mut self) -> bool {
        self.tree.select_next_sibling()
    }

    pub fn select_previous_branch(&mut self) -> bool {
        self.tree.select_previous_branch()
    }

    pub fn select_next_branch(&mut self) -> bool {
        self.tree.select_next_branch()
    }

    pub fn select_by_key(&mut self, key: NodeKey) -> bool {
        self.tree.select_by_key(key)
    }

    pub fn remove_child(&mut self, key: NodeKey) -> bool {
        self.tree.remove_child(key)
    }

    // Import and export

    pub fn parse_notation_text(text: &str) -> Result<ParsedGame, NotationError> {
        notation::parse_notation_text(text)
    }

    /// Parse PGN `text` and replay its moves from the root.
    ///
    /// Moves already in the tree are revisited rather than duplicated. The
    /// import is all or nothing.
    pub fn import_notation(&mut self, text: &str) -> Result<ParsedGame, ImportError> {
        let game = notation::parse_notation_text(text)?;
        self.import_game(&game)?;
        Ok(game)
    }

    /// Replay an already parsed game. A `FEN` header replaces the tree with
    /// one rooted at that position.
    pub fn import_game(&mut self, game: &ParsedGame) -> Result<(), ImportError> {
        let mut staging = match game.header("FEN") {
            Some(fen) => GameTree::new(GameState::from_fen(fen)?),
            None => {
                let mut tree = self.tree.clone();
                if self.options.import_resets_tree {
                    tree.reset();
                }
                tree.select_first();
                tree
            }
        };

        let root = staging.current_state_mut().annotations_mut();
        for comment in &game.comments {
            if !root.comments().contains(comment) {
                root.add_comment(comment.as_str());
            }
        }

        for (idx, mv) in game.plies().enumerate() {
            let ply = idx + 1;
            let state = staging.current_state();
            let resolved =
                resolve_san(state, &mv.san).map_err(|source| ImportError::San { ply, source })?;
            let promotion = resolved.promotion.unwrap_or(self.options.promotion_piece);
            let next = state
                .apply_move(resolved.from, resolved.to, promotion)
                .map_err(|source| ImportError::Move { ply, source })?;
            staging.add_child(next);

            let annotations = staging.current_state_mut().annotations_mut();
            for &(color, square) in &mv.marks {
                annotations.insert_mark(square, color);
            }
            for &(color, from, to) in &mv.arrows {
                annotations.insert_arrow(from, to, color);
            }
            for comment in &mv.comments {
                annotations.add_comment(comment.as_str());
            }
        }

        trace_log!(
            debug,
            "imported {} ply(s), tree now holds {} node(s)",
            game.ply_count(),
            staging.node_count()
        );
        self.tree = staging;
        Ok(())
    }

    /// The line from the root to the current node as a parsed game.
    #[must_use]
    pub fn current_game(&self) -> ParsedGame {
        let line = self.current_line();
        let mut game = ParsedGame::default();

        let root = self.tree.root().state();
        if root.position() != GameState::new().position() {
            game.headers.push(("SetUp".to_string(), "1".to_string()));
            game.headers.push(("FEN".to_string(), root.to_fen()));
        }
        game.comments = root.annotations().comments().to_vec();

        for entry in line.iter().skip(1) {
            let state = entry.state;
            let annotations = state.annotations();
            let parsed = ParsedMove {
                san: state.notation().unwrap_or_default().to_string(),
                comments: annotations.comments().to_vec(),
                marks: AnnotationColor::ALL
                    .into_iter()
                    .flat_map(|color| annotations.marks(color).map(move |sq| (color, sq)))
                    .collect(),
                arrows: AnnotationColor::ALL
                    .into_iter()
                    .flat_map(|color| {
                        annotations
                            .arrows(color)
                            .map(move |(from, to)| (color, from, to))
                    })
                    .collect(),
                clock: None,
            };
            // The mover is the side not on move after it.
            let number = (state.ply() - 1) / 2 + 1;
            let white_moved = state.turn() == Color::Black;
            let open_pair = matches!(
                game.moves.last(),
                Some(pair) if pair.number == number && pair.black.is_none()
            );
            if white_moved {
                game.moves.push(TurnPair {
                    number,
                    white: Some(parsed),
                    black: None,
                });
            } else if let (true, Some(pair)) = (open_pair, game.moves.last_mut()) {
                pair.black = Some(parsed);
            } else {
                game.moves.push(TurnPair {
                    number,
                    white: None,
                    black: Some(parsed),
                });
            }
        }

        let last = self.current_state();
        game.result = Some(if last.is_checkmate() {
            match last.turn() {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            }
        } else if last.is_stalemate() {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        });
        game
    }

    /// PGN for the line from the root to the current node.
    #[must_use]
    pub fn export_notation(&self) -> String {
        notation::write_game(&self.current_game())
    }

    // Persistence

    #[must_use]
    pub fn to_portable(&self) -> PortableTree {
        serialize_tree(&self.tree)
    }

    /// Rebuild a controller from `portable`, rooted at `initial`.
    pub fn from_portable(
        portable: &PortableTree,
        initial: &GameState,
    ) -> Result<Self, SerializeError> {
        Ok(GameController {
            tree: deserialize_tree(portable, initial)?,
            options: GameOptions::default(),
        })
    }
}

//! Portable form of a game tree.
//!
//! Each node stores only what cannot be recomputed: the occupied squares, the
//! move list and any non-empty annotations. Loading replays every node's last
//! move onto its rebuilt parent and checks the result against what was
//! stored, so a tampered or truncated tree is rejected rather than trusted.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{MoveError, MoveRecord, Piece, Square};
use crate::game::{AnnotationColor, GameState};
use crate::tree::{GameTree, GameTreeNode};
use crate::zobrist::{child_id, root_id, NodeId};

/// Error type for rebuilding a tree from its portable form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializeError {
    /// The root id is missing from the node table or is not a root
    MissingRoot { id: NodeId },
    /// A node refers to an id that is not in the node table
    DanglingReference { id: NodeId },
    /// A node's parent does not list it as a child
    ParentMismatch { id: NodeId },
    /// A stored move is not coordinate text
    InvalidMove { id: NodeId, text: String },
    /// A stored move is not legal in its parent's position
    IllegalMove { id: NodeId, source: MoveError },
    /// A stored id differs from the one its move produces
    IdMismatch { expected: NodeId, found: NodeId },
    /// The replayed board differs from the stored one
    BoardMismatch { id: NodeId },
    /// The stored move list is not the parent's list plus one move
    MoveListMismatch { id: NodeId },
    /// Selected child index out of range, or set on a leaf
    InvalidSelection { id: NodeId },
    /// Annotation square text is not a square
    InvalidSquare { text: String },
    /// Stored nodes that cannot be reached from the root
    UnreachableNodes { count: usize },
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::MissingRoot { id } => write!(f, "Root node {id:#018x} not found"),
            SerializeError::DanglingReference { id } => {
                write!(f, "Reference to unknown node {id:#018x}")
            }
            SerializeError::ParentMismatch { id } => {
                write!(f, "Node {id:#018x} disagrees with its parent")
            }
            SerializeError::InvalidMove { id, text } => {
                write!(f, "Node {id:#018x} has invalid move '{text}'")
            }
            SerializeError::IllegalMove { id, source } => {
                write!(f, "Node {id:#018x}: {source}")
            }
            SerializeError::IdMismatch { expected, found } => {
                write!(f, "Node id {found:#018x} should be {expected:#018x}")
            }
            SerializeError::BoardMismatch { id } => {
                write!(f, "Node {id:#018x} board does not match its moves")
            }
            SerializeError::MoveListMismatch { id } => {
                write!(f, "Node {id:#018x} move list does not extend its parent's")
            }
            SerializeError::InvalidSelection { id } => {
                write!(f, "Node {id:#018x} selects a child it does not have")
            }
            SerializeError::InvalidSquare { text } => {
                write!(f, "Invalid square '{text}' in annotations")
            }
            SerializeError::UnreachableNodes { count } => {
                write!(f, "{count} node(s) are not reachable from the root")
            }
        }
    }
}

impl std::error::Error for SerializeError {}

/// Sparse snapshot: occupied squares, moves and non-empty annotations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PortableState {
    /// Square (`e4`) to piece id (`wP4`, or `wP4=Q` once promoted).
    pub squares: BTreeMap<String, String>,
    /// Coordinate moves from the root (`e2e4`, `e7e8q`).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub moves: Vec<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub marks: BTreeMap<AnnotationColor, Vec<String>>,
    /// Arrows as `e2e4` text per color.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub arrows: BTreeMap<AnnotationColor, Vec<String>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub comments: Vec<String>,
}

impl PortableState {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let annotations = state.annotations();
        let marks = AnnotationColor::ALL
            .into_iter()
            .map(|color| {
                let squares: Vec<String> =
                    annotations.marks(color).map(|sq| sq.to_string()).collect();
                (color, squares)
            })
            .filter(|(_, squares)| !squares.is_empty())
            .collect();
        let arrows = AnnotationColor::ALL
            .into_iter()
            .map(|color| {
                let arrows: Vec<String> = annotations
                    .arrows(color)
                    .map(|(from, to)| format!("{from}{to}"))
                    .collect();
                (color, arrows)
            })
            .filter(|(_, arrows)| !arrows.is_empty())
            .collect();

        PortableState {
            squares: sparse_board(state),
            moves: state.moves().iter().map(ToString::to_string).collect(),
            marks,
            arrows,
            comments: annotations.comments().to_vec(),
        }
    }

    /// Put the stored annotations onto `state`, which starts with empty ones.
    fn overlay(&self, state: &mut GameState) -> Result<(), SerializeError> {
        let annotations = state.annotations_mut();
        for (&color, squares) in &self.marks {
            for text in squares {
                annotations.insert_mark(parse_square(text)?, color);
            }
        }
        for (&color, arrows) in &self.arrows {
            for text in arrows {
                if !text.is_ascii() || text.len() != 4 {
                    return Err(SerializeError::InvalidSquare { text: text.clone() });
                }
                let (from, to) = (parse_square(&text[..2])?, parse_square(&text[2..])?);
                annotations.insert_arrow(from, to, color);
            }
        }
        for comment in &self.comments {
            annotations.add_comment(comment.as_str());
        }
        Ok(())
    }
}

fn parse_square(text: &str) -> Result<Square, SerializeError> {
    text.parse().map_err(|_| SerializeError::InvalidSquare {
        text: text.to_string(),
    })
}

fn sparse_board(state: &GameState) -> BTreeMap<String, String> {
    let board = state.board();
    board
        .occupied()
        .map(|(sq, id)| {
            let text = match board.info(id).promoted {
                Some(kind) => format!("{id}={}", kind.to_char().to_ascii_uppercase()),
                None => id.to_string(),
            };
            (sq.to_string(), text)
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PortableNode {
    pub state: PortableState,
    pub parent_id: Option<NodeId>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub child_ids: Vec<NodeId>,
    pub selected_child_index: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PortableTree {
    pub root_id: NodeId,
    pub current_node_id: NodeId,
    pub nodes: BTreeMap<NodeId, PortableNode>,
}

/// Flatten `tree` into its portable form.
#[must_use]
pub fn serialize_tree(tree: &GameTree) -> PortableTree {
    let nodes = tree
        .nodes()
        .map(|node| {
            (
                node.id(),
                PortableNode {
                    state: PortableState::from_state(node.state()),
                    parent_id: node.parent(),
                    child_ids: node.children().to_vec(),
                    selected_child_index: node.selected(),
                },
            )
        })
        .collect();
    PortableTree {
        root_id: tree.root_id(),
        current_node_id: tree.current_id(),
        nodes,
    }
}

/// Rebuild a tree whose root is `initial`, replaying every stored move.
pub fn deserialize_tree(
    portable: &PortableTree,
    initial: &GameState,
) -> Result<GameTree, SerializeError> {
    let root = portable.root_id;
    let stored_root = portable
        .nodes
        .get(&root)
        .filter(|node| node.parent_id.is_none())
        .ok_or(SerializeError::MissingRoot { id: root })?;
    if root != root_id() {
        return Err(SerializeError::IdMismatch {
            expected: root_id(),
            found: root,
        });
    }

    let mut root_state = initial.clone();
    if sparse_board(&root_state) != stored_root.state.squares
        || !stored_root.state.moves.is_empty()
    {
        return Err(SerializeError::BoardMismatch { id: root });
    }
    stored_root.state.overlay(&mut root_state)?;

    let mut nodes: HashMap<NodeId, GameTreeNode> = HashMap::new();
    let mut seen = HashSet::from([root]);
    let mut queue = VecDeque::from([(root, root_state)]);

    while let Some((id, state)) = queue.pop_front() {
        let stored = portable
            .nodes
            .get(&id)
            .ok_or(SerializeError::DanglingReference { id })?;
        check_selection(id, stored)?;

        for &child in &stored.child_ids {
            let stored_child = portable
                .nodes
                .get(&child)
                .ok_or(SerializeError::DanglingReference { id: child })?;
            if stored_child.parent_id != Some(id) || !seen.insert(child) {
                return Err(SerializeError::ParentMismatch { id: child });
            }
            let child_state = replay(child, &state, &stored_child.state)?;
            let Some(key) = child_state.key() else {
                return Err(SerializeError::MoveListMismatch { id: child });
            };
            let expected = child_id(id, key);
            if expected != child {
                return Err(SerializeError::IdMismatch {
                    expected,
                    found: child,
                });
            }
            queue.push_back((child, child_state));
        }

        let mut node = GameTreeNode::new(id, state, stored.parent_id);
        node.children = stored.child_ids.clone();
        node.selected = stored.selected_child_index;
        nodes.insert(id, node);
    }

    if nodes.len() != portable.nodes.len() {
        return Err(SerializeError::UnreachableNodes {
            count: portable.nodes.len() - nodes.len(),
        });
    }
    if !nodes.contains_key(&portable.current_node_id) {
        return Err(SerializeError::DanglingReference {
            id: portable.current_node_id,
        });
    }

    trace_log!(debug, "deserialized tree with {} node(s)", nodes.len());
    Ok(GameTree::from_parts(root, portable.current_node_id, nodes))
}

fn check_selection(id: NodeId, stored: &PortableNode) -> Result<(), SerializeError> {
    let valid = match stored.selected_child_index {
        None => stored.child_ids.is_empty(),
        Some(idx) => idx < stored.child_ids.len(),
    };
    if valid {
        Ok(())
    } else {
        Err(SerializeError::InvalidSelection { id })
    }
}

/// Play the last stored move of `stored` onto `parent` and verify the result.
fn replay(
    id: NodeId,
    parent: &GameState,
    stored: &PortableState,
) -> Result<GameState, SerializeError> {
    let Some(text) = stored.moves.last() else {
        return Err(SerializeError::MoveListMismatch { id });
    };
    let record: MoveRecord = text.parse().map_err(|_| SerializeError::InvalidMove {
        id,
        text: text.clone(),
    })?;
    let mut state = parent
        .apply_move(record.from, record.to, record.promotion.unwrap_or(Piece::Queen))
        .map_err(|source| SerializeError::IllegalMove { id, source })?;

    let replayed: Vec<String> = state.moves().iter().map(ToString::to_string).collect();
    if replayed != stored.moves {
        return Err(SerializeError::MoveListMismatch { id });
    }
    if sparse_board(&state) != stored.squares {
        return Err(SerializeError::BoardMismatch { id });
    }
    stored.overlay(&mut state)?;
    Ok(state)
}

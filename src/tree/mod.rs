//! Branching game history.
//!
//! Nodes live in an arena keyed by [`NodeId`]. A child's id is derived from
//! its parent's id and the move that reaches it, so replaying a move that is
//! already stored lands on the existing node instead of duplicating it.
//!
//! Every node remembers which child the main line follows. Navigation moves a
//! cursor (the current node) and keeps the selected-child path from the root
//! to the cursor intact.

mod node;

use std::collections::HashMap;

pub use node::{GameTreeNode, LineEntry};

use crate::board::NodeKey;
use crate::game::GameState;
use crate::zobrist::{child_id, root_id, NodeId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameTree {
    root_id: NodeId,
    current_id: NodeId,
    nodes: HashMap<NodeId, GameTreeNode>,
}

impl Default for GameTree {
    fn default() -> Self {
        GameTree::new(GameState::new())
    }
}

impl GameTree {
    /// A tree holding only `initial` as its root.
    #[must_use]
    pub fn new(initial: GameState) -> Self {
        let id = root_id();
        let mut nodes = HashMap::new();
        nodes.insert(id, GameTreeNode::new(id, initial, None));
        GameTree {
            root_id: id,
            current_id: id,
            nodes,
        }
    }

    pub(crate) fn from_parts(
        root_id: NodeId,
        current_id: NodeId,
        nodes: HashMap<NodeId, GameTreeNode>,
    ) -> Self {
        GameTree {
            root_id,
            current_id,
            nodes,
        }
    }

    fn expect_node(&self, id: NodeId) -> &GameTreeNode {
        match self.nodes.get(&id) {
            Some(node) => node,
            None => panic!("dangling node reference {id:#018x}"),
        }
    }

    fn expect_node_mut(&mut self, id: NodeId) -> &mut GameTreeNode {
        match self.nodes.get_mut(&id) {
            Some(node) => node,
            None => panic!("dangling node reference {id:#018x}"),
        }
    }

    #[inline]
    #[must_use]
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    #[inline]
    #[must_use]
    pub fn current_id(&self) -> NodeId {
        self.current_id
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&GameTreeNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GameTreeNode> + '_ {
        self.nodes.values()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn root(&self) -> &GameTreeNode {
        self.expect_node(self.root_id)
    }

    #[must_use]
    pub fn current_node(&self) -> &GameTreeNode {
        self.expect_node(self.current_id)
    }

    #[must_use]
    pub fn current_state(&self) -> &GameState {
        &self.current_node().state
    }

    /// In-place access for annotations, which never branch the tree.
    pub(crate) fn current_state_mut(&mut self) -> &mut GameState {
        let id = self.current_id;
        &mut self.expect_node_mut(id).state
    }

    /// Store `state` as a child of the current node and move onto it.
    ///
    /// If the current node already has a child reached by the same move, that
    /// child's state is replaced and it becomes the selected branch.
    ///
    /// # Panics
    /// Panics if `state` was not produced by a move.
    pub fn add_child(&mut self, state: GameState) -> NodeId {
        let Some(key) = state.key() else {
            panic!("add_child needs a state produced by a move");
        };
        let parent_id = self.current_id;
        let id = child_id(parent_id, key);

        let parent = self.expect_node_mut(parent_id);
        if let Some(idx) = parent.children.iter().position(|&c| c == id) {
            parent.selected = Some(idx);
            self.expect_node_mut(id).state = state;
            trace_log!(trace, "replayed {key} onto existing node {id:#018x}");
        } else {
            parent.children.push(id);
            parent.selected = Some(parent.children.len() - 1);
            if self
                .nodes
                .insert(id, GameTreeNode::new(id, state, Some(parent_id)))
                .is_some()
            {
                panic!("node id collision at {id:#018x}");
            }
            trace_log!(debug, "added node {id:#018x} for {key}");
        }
        self.current_id = id;
        id
    }

    /// Jump to the root.
    pub fn select_first(&mut self) -> bool {
        self.move_to(self.root_id)
    }

    /// Follow selected children down to a leaf.
    pub fn select_last(&mut self) -> bool {
        let mut id = self.current_id;
        while let Some(next) = self.expect_node(id).selected_child() {
            id = next;
        }
        self.move_to(id)
    }

    /// Step to the parent; no-op at the root.
    pub fn select_previous(&mut self) -> bool {
        match self.current_node().parent {
            Some(parent) => self.move_to(parent),
            None => false,
        }
    }

    /// Step to the selected child; no-op at a leaf.
    pub fn select_next(&mut self) -> bool {
        match self.current_node().selected_child() {
            Some(child) => self.move_to(child),
            None => false,
        }
    }

    /// Cycle to the next sibling, wrapping round, and make it the selected
    /// branch.
    pub fn select_next_sibling(&mut self) -> bool {
        let Some(parent_id) = self.current_node().parent else {
            return false;
        };
        let current = self.current_id;
        let parent = self.expect_node_mut(parent_id);
        if parent.children.len() < 2 {
            return false;
        }
        let idx = parent
            .children
            .iter()
            .position(|&c| c == current)
            .unwrap_or_default();
        let next = (idx + 1) % parent.children.len();
        parent.selected = Some(next);
        let id = parent.children[next];
        self.move_to(id)
    }

    /// Jump back to the nearest ancestor that sits on a decision point,
    /// skipping the current node's own branch.
    pub fn select_previous_branch(&mut self) -> bool {
        let Some(mut id) = self.current_node().parent else {
            return false;
        };
        while let Some(parent) = self.expect_node(id).parent {
            if self.expect_node(parent).is_decision_point() {
                return self.move_to(id);
            }
            id = parent;
        }
        false
    }

    /// Follow selected children to the nearest decision point and land on
    /// its selected child.
    pub fn select_next_branch(&mut self) -> bool {
        let mut id = self.current_id;
        loop {
            let node = self.expect_node(id);
            let Some(child) = node.selected_child() else {
                return false;
            };
            if node.is_decision_point() {
                return self.move_to(child);
            }
            id = child;
        }
    }

    /// Move to the current node's child reached by `key`.
    pub fn select_by_key(&mut self, key: NodeKey) -> bool {
        let Some(idx) = self.child_index(key) else {
            return false;
        };
        let node = self.expect_node_mut(self.current_id);
        node.selected = Some(idx);
        let id = node.children[idx];
        self.move_to(id)
    }

    fn move_to(&mut self, id: NodeId) -> bool {
        if id == self.current_id {
            return false;
        }
        self.current_id = id;
        true
    }

    fn child_index(&self, key: NodeKey) -> Option<usize> {
        self.current_node()
            .children
            .iter()
            .position(|&c| self.expect_node(c).state.key() == Some(key))
    }

    /// Root to current node, with each node's place among its siblings.
    #[must_use]
    pub fn current_line(&self) -> Vec<LineEntry<'_>> {
        let mut line = Vec::new();
        let mut id = self.current_id;
        loop {
            let node = self.expect_node(id);
            let (index, count) = match node.parent {
                Some(parent) => {
                    let siblings = &self.expect_node(parent).children;
                    let index = siblings.iter().position(|&c| c == id).unwrap_or_default();
                    (index, siblings.len())
                }
                None => (0, 1),
            };
            line.push(LineEntry {
                id,
                state: &node.state,
                index,
                count,
            });
            match node.parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
        line.reverse();
        line
    }

    /// States of the current node's children in insertion order.
    #[must_use]
    pub fn current_children(&self) -> Vec<&GameState> {
        self.current_node()
            .children
            .iter()
            .map(|&c| &self.expect_node(c).state)
            .collect()
    }

    /// Detach the child reached by `key`, dropping its whole subtree.
    pub fn remove_child(&mut self, key: NodeKey) -> bool {
        let Some(idx) = self.child_index(key) else {
            return false;
        };
        let node = self.expect_node_mut(self.current_id);
        let removed = node.children.remove(idx);
        node.selected = match node.selected {
            _ if node.children.is_empty() => None,
            Some(sel) if sel > idx => Some(sel - 1),
            Some(sel) => Some(sel.min(node.children.len() - 1)),
            None => Some(0),
        };

        let mut stack = vec![removed];
        let mut pruned = 0usize;
        while let Some(id) = stack.pop() {
            if let Some(gone) = self.nodes.remove(&id) {
                stack.extend(gone.children);
                pruned += 1;
            }
        }
        trace_log!(debug, "pruned {pruned} node(s) under {key}");
        true
    }

    /// Drop everything but the root and move onto it.
    pub fn reset(&mut self) {
        let root_id = self.root_id;
        self.nodes.retain(|&id, _| id == root_id);
        let root = self.expect_node_mut(root_id);
        root.children.clear();
        root.selected = None;
        self.current_id = root_id;
    }

    #[must_use]
    pub fn is_current_node_leaf(&self) -> bool {
        self.current_node().is_leaf()
    }

    #[must_use]
    pub fn is_current_node_root(&self) -> bool {
        self.current_id == self.root_id
    }

    /// The current node has at least one sibling.
    #[must_use]
    pub fn is_current_node_sibling(&self) -> bool {
        self.current_node()
            .parent
            .is_some_and(|parent| self.expect_node(parent).is_decision_point())
    }
}

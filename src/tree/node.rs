use crate::game::GameState;
use crate::zobrist::NodeId;

/// One position in the tree. Parent and children are ids into the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameTreeNode {
    pub(crate) id: NodeId,
    pub(crate) state: GameState,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// `None` exactly when `children` is empty.
    pub(crate) selected: Option<usize>,
}

impl GameTreeNode {
    pub(crate) fn new(id: NodeId, state: GameState, parent: Option<NodeId>) -> Self {
        GameTreeNode {
            id,
            state,
            parent,
            children: Vec::new(),
            selected: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Index into `children` of the branch the main line follows.
    #[inline]
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn selected_child(&self) -> Option<NodeId> {
        self.selected.and_then(|idx| self.children.get(idx).copied())
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// More than one continuation is stored here.
    #[must_use]
    pub fn is_decision_point(&self) -> bool {
        self.children.len() > 1
    }
}

/// One step of [`super::GameTree::current_line`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineEntry<'a> {
    pub id: NodeId,
    pub state: &'a GameState,
    /// Position of this node among its siblings; 0 for the root.
    pub index: usize,
    /// Number of siblings including this node; 1 for the root.
    pub count: usize,
}

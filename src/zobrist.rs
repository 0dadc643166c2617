//! Zobrist-style keys for game tree node ids.
//!
//! A child id mixes its parent's id with random keys for the move's source
//! and target squares, so the same move played from different nodes yields
//! different ids while replaying it from the same node yields the same one.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::NodeKey;

/// Identifier of a node in a [`crate::tree::GameTree`].
pub type NodeId = u64;

const MIX_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

pub(crate) struct NodeHashKeys {
    pub(crate) root: u64,
    // from_keys[square_index] / to_keys[square_index]
    pub(crate) from_keys: [u64; 64],
    pub(crate) to_keys: [u64; 64],
}

impl NodeHashKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1234567890_u64); // Use a fixed seed for reproducibility
        let root = rng.gen();
        let mut from_keys = [0; 64];
        let mut to_keys = [0; 64];

        for key in &mut from_keys {
            *key = rng.gen();
        }
        for key in &mut to_keys {
            *key = rng.gen();
        }

        NodeHashKeys {
            root,
            from_keys,
            to_keys,
        }
    }
}

pub(crate) static NODE_KEYS: Lazy<NodeHashKeys> = Lazy::new(NodeHashKeys::new);

/// Id of every tree's root node.
#[inline]
#[must_use]
pub fn root_id() -> NodeId {
    NODE_KEYS.root
}

/// Deterministic id of the child reached from `parent` by `key`.
#[inline]
#[must_use]
pub fn child_id(parent: NodeId, key: NodeKey) -> NodeId {
    let keys = &*NODE_KEYS;
    parent.rotate_left(17).wrapping_mul(MIX_MULTIPLIER)
        ^ keys.from_keys[key.from.as_index()]
        ^ keys.to_keys[key.to.as_index()]
}

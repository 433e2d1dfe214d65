//! Consistency checks over a [`Tree`], mostly for tests. Both hold for every
//! tree built through the move engine.

use crate::tree::Tree;
use crate::{TreeId, TreeMeta};

/// True iff every entry is keyed by its own child id, i.e. each child has
/// exactly one parent.
pub fn has_unique_parents<ID: TreeId, TM: TreeMeta>(tree: &Tree<ID, TM>) -> bool {
    tree.iter().all(|(id, node)| id == node.child_id())
}

/// True iff no node is its own ancestor.
pub fn is_acyclic<ID: TreeId, TM: TreeMeta>(tree: &Tree<ID, TM>) -> bool {
    // a cycle through a node is found within num_nodes steps of it.
    let bound = tree.num_nodes();
    tree.iter()
        .all(|(id, _)| !tree.ancestors(id).take(bound).any(|a| a == id))
}

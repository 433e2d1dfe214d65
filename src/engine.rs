//! Single-move transformations of a [`Tree`]: apply, undo and redo.
//!
//! A move is rejected, leaving the tree as it was, when the child would be
//! its own parent, when the new parent is not in the tree, or when the new
//! parent is a descendant of the child. Rejected moves are still logged with
//! the requested parent, so that a later redo can decide again against the
//! tree as it is then.

use log::{debug, trace};

use crate::op_move::{LogOpMove, OpMove};
use crate::state::State;
use crate::tree::Tree;
use crate::tree_node::TreeNode;
use crate::{Timestamp, TreeId, TreeMeta};

fn is_legal<ID: TreeId, TM: TreeMeta, T>(tree: &Tree<ID, TM>, op: &OpMove<ID, TM, T>) -> bool {
    match op.parent_id() {
        None => true,
        Some(parent) => {
            parent != op.child_id()
                && tree.find(parent).is_some()
                && !tree.is_ancestor(op.child_id(), parent)
        }
    }
}

/// Applies `op` to `tree`, returning the resulting tree and the log record.
pub fn apply_move<ID, TM, T>(
    tree: Tree<ID, TM>,
    op: OpMove<ID, TM, T>,
) -> (Tree<ID, TM>, LogOpMove<ID, TM, T>)
where
    ID: TreeId,
    TM: TreeMeta,
    T: Timestamp,
{
    let old_parent = tree.find(op.child_id()).cloned();

    if !is_legal(&tree, &op) {
        debug!(
            "rejected move at {:?}: {:?} under {:?}",
            op.timestamp(),
            op.child_id(),
            op.parent_id()
        );
        return (tree, LogOpMove::new(op, old_parent));
    }

    trace!(
        "move at {:?}: {:?} under {:?}",
        op.timestamp(),
        op.child_id(),
        op.parent_id()
    );
    let node = TreeNode::new(
        op.parent_id().cloned(),
        op.metadata().clone(),
        op.child_id().clone(),
    );
    let tree = tree.with_node(op.child_id().clone(), node);
    (tree, LogOpMove::new(op, old_parent))
}

/// Reverts the effect of `logged` on `tree`.
///
/// Safe to call for rejected moves too: the child's entry is put back to
/// what it was before the move, which for a rejection is what it still is.
pub fn undo_move<ID, TM, T>(tree: Tree<ID, TM>, logged: &LogOpMove<ID, TM, T>) -> Tree<ID, TM>
where
    ID: TreeId,
    TM: TreeMeta,
{
    match logged.old_parent() {
        Some(old) => tree.with_node(logged.child_id().clone(), old.clone()),
        None => tree.without_node(logged.child_id()),
    }
}

/// Re-applies the move behind `logged` to the current tree and appends the
/// fresh record to the log. Legality is decided again, so the outcome may
/// differ from the one originally recorded.
pub fn redo_move<ID, TM, T>(state: State<ID, TM, T>, logged: &LogOpMove<ID, TM, T>) -> State<ID, TM, T>
where
    ID: TreeId,
    TM: TreeMeta,
    T: Timestamp,
{
    let (tree, mut log) = state.into_parts();
    let (tree, relogged) = apply_move(tree, logged.op_move());
    log.push(relogged);
    State::from_parts(tree, log)
}

use serde::{Deserialize, Serialize};

use crate::tree_node::TreeNode;

/// Request to place `child` under `parent` with `metadata`, as of `timestamp`.
///
/// A `None` parent makes the child a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpMove<ID, TM, T> {
    timestamp: T,
    parent: Option<ID>,
    metadata: TM,
    child: ID,
}

impl<ID, TM, T> OpMove<ID, TM, T> {
    pub fn new(timestamp: T, parent: Option<ID>, metadata: TM, child: ID) -> Self {
        Self {
            timestamp,
            parent,
            metadata,
            child,
        }
    }

    pub fn timestamp(&self) -> &T {
        &self.timestamp
    }

    pub fn parent_id(&self) -> Option<&ID> {
        self.parent.as_ref()
    }

    pub fn metadata(&self) -> &TM {
        &self.metadata
    }

    pub fn child_id(&self) -> &ID {
        &self.child
    }
}

/// The logged record of an applied move.
///
/// `old_parent` is the child's entry just before the move was applied (none
/// if the child did not exist yet), which is all that undo needs.
/// `new_parent` is the parent that was requested, whether or not the move
/// was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogOpMove<ID, TM, T> {
    timestamp: T,
    old_parent: Option<TreeNode<ID, TM>>,
    new_parent: Option<ID>,
    metadata: TM,
    child: ID,
}

impl<ID, TM, T> LogOpMove<ID, TM, T> {
    pub fn new(op: OpMove<ID, TM, T>, old_parent: Option<TreeNode<ID, TM>>) -> Self {
        Self {
            timestamp: op.timestamp,
            old_parent,
            new_parent: op.parent,
            metadata: op.metadata,
            child: op.child,
        }
    }

    pub fn timestamp(&self) -> &T {
        &self.timestamp
    }

    pub fn old_parent(&self) -> Option<&TreeNode<ID, TM>> {
        self.old_parent.as_ref()
    }

    pub fn new_parent(&self) -> Option<&ID> {
        self.new_parent.as_ref()
    }

    pub fn metadata(&self) -> &TM {
        &self.metadata
    }

    pub fn child_id(&self) -> &ID {
        &self.child
    }
}

impl<ID: Clone, TM: Clone, T: Clone> LogOpMove<ID, TM, T> {
    /// The move this record was made from.
    pub fn op_move(&self) -> OpMove<ID, TM, T> {
        OpMove::new(
            self.timestamp.clone(),
            self.new_parent.clone(),
            self.metadata.clone(),
            self.child.clone(),
        )
    }
}

impl<ID, TM, T> From<LogOpMove<ID, TM, T>> for OpMove<ID, TM, T> {
    fn from(logged: LogOpMove<ID, TM, T>) -> Self {
        OpMove::new(
            logged.timestamp,
            logged.new_parent,
            logged.metadata,
            logged.child,
        )
    }
}

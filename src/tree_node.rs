use serde::{Deserialize, Serialize};

/// A child's entry in the tree: its parent (none for a root), the metadata
/// on the edge to that parent, and the child's own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode<ID, TM> {
    parent_id: Option<ID>,
    metadata: TM,
    child_id: ID,
}

impl<ID, TM> TreeNode<ID, TM> {
    pub fn new(parent_id: Option<ID>, metadata: TM, child_id: ID) -> Self {
        Self {
            parent_id,
            metadata,
            child_id,
        }
    }

    pub fn parent_id(&self) -> Option<&ID> {
        self.parent_id.as_ref()
    }

    pub fn metadata(&self) -> &TM {
        &self.metadata
    }

    pub fn child_id(&self) -> &ID {
        &self.child_id
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

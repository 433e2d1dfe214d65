use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::tree_node::TreeNode;
use crate::{TreeId, TreeMeta};

/// Immutable parent/metadata relation, keyed by child.
///
/// Cloning a tree is cheap: clones share storage until one of them is
/// modified, at which point the modified copy gets its own map. Snapshots
/// taken earlier are never affected by later moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<ID, TM> {
    nodes: Arc<BTreeMap<ID, TreeNode<ID, TM>>>,
}

impl<ID, TM> Default for Tree<ID, TM> {
    fn default() -> Self {
        Self {
            nodes: Arc::new(BTreeMap::new()),
        }
    }
}

impl<ID: TreeId, TM: TreeMeta> Tree<ID, TM> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, id: &ID) -> Option<&TreeNode<ID, TM>> {
        self.nodes.get(id)
    }

    /// Like `find`, for callers that know the node must exist.
    pub fn require(&self, id: &ID) -> Result<&TreeNode<ID, TM>> {
        self.find(id)
            .ok_or_else(|| Error::NodeNotFound(format!("{:?}", id)))
    }

    /// Parent id and edge metadata of `child`; none if `child` is absent or a root.
    pub fn parent_of(&self, child: &ID) -> Option<(&ID, &TM)> {
        let node = self.find(child)?;
        node.parent_id().map(|p| (p, node.metadata()))
    }

    /// Lazily walks from `child`'s parent up to its root.
    pub fn ancestors<'t>(&'t self, child: &ID) -> Ancestors<'t, ID, TM> {
        Ancestors {
            tree: self,
            next: self.parent_of(child).map(|(p, _)| p),
        }
    }

    /// Ancestors of `child`, nearest first, ending at a root. Empty when
    /// `child` is a root or absent.
    pub fn path_to_root(&self, child: &ID) -> Vec<ID> {
        self.ancestors(child).cloned().collect()
    }

    /// True iff `candidate` is a strict ancestor of `child`.
    pub fn is_ancestor(&self, candidate: &ID, child: &ID) -> bool {
        self.ancestors(child).any(|a| a == candidate)
    }

    pub fn children(&self, parent: &ID) -> Vec<ID> {
        self.nodes
            .values()
            .filter(|n| n.parent_id() == Some(parent))
            .map(|n| n.child_id().clone())
            .collect()
    }

    /// First child of `parent` whose metadata satisfies `pred`.
    pub fn child_by<F>(&self, parent: &ID, mut pred: F) -> Option<&TreeNode<ID, TM>>
    where
        F: FnMut(&TM) -> bool,
    {
        self.nodes
            .values()
            .find(|n| n.parent_id() == Some(parent) && pred(n.metadata()))
    }

    pub fn iter(&self) -> btree_map::Iter<'_, ID, TreeNode<ID, TM>> {
        self.nodes.iter()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn with_node(mut self, id: ID, node: TreeNode<ID, TM>) -> Self {
        Arc::make_mut(&mut self.nodes).insert(id, node);
        self
    }

    pub(crate) fn without_node(mut self, id: &ID) -> Self {
        if self.nodes.contains_key(id) {
            Arc::make_mut(&mut self.nodes).remove(id);
        }
        self
    }
}

/// Iterator over a node's ancestors. See [`Tree::ancestors`].
///
/// Does not terminate if the tree contains a cycle.
pub struct Ancestors<'t, ID, TM> {
    tree: &'t Tree<ID, TM>,
    next: Option<&'t ID>,
}

impl<'t, ID: TreeId, TM: TreeMeta> Iterator for Ancestors<'t, ID, TM> {
    type Item = &'t ID;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = self.tree.parent_of(current).map(|(p, _)| p);
        Some(current)
    }
}

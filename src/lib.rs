//! A replicated tree that converges under concurrent moves.
//!
//! Implements the move operation from Kleppmann et al., "A highly-available
//! move operation for replicated trees". Every edit is a single move: reparent
//! a child (and rewrite its metadata) under a new parent. Replicas that have
//! received the same set of moves end up with the same tree, whatever order
//! the moves arrived in.
//!
//! ```
//! use sn_tree::{insert_all, OpMove, State};
//!
//! let ops = vec![
//!     OpMove::new(0, None, "root", 'r'),
//!     OpMove::new(2, Some('a'), "b", 'b'),
//!     OpMove::new(1, Some('r'), "a", 'a'),
//! ];
//! let state: State<char, &str, u32> = insert_all(ops, None);
//!
//! assert_eq!(state.tree().path_to_root(&'b'), vec!['a', 'r']);
//! assert!(sn_tree::is_acyclic(state.tree()));
//! ```

mod clock;
mod engine;
mod error;
mod invariants;
mod op_move;
mod state;
mod tree;
mod tree_node;
mod tree_replica;
pub mod wire;

use std::fmt::Debug;

pub use clock::Clock;
pub use engine::{apply_move, redo_move, undo_move};
pub use error::{Error, Result};
pub use invariants::{has_unique_parents, is_acyclic};
pub use op_move::{LogOpMove, OpMove};
pub use state::{insert_all, insert_move, State};
pub use tree::{Ancestors, Tree};
pub use tree_node::TreeNode;
pub use tree_replica::TreeReplica;

/// Identifier of a tree node.
pub trait TreeId: Ord + Clone + Debug {}
impl<ID: Ord + Clone + Debug> TreeId for ID {}

/// Payload carried on the edge from a node to its parent.
pub trait TreeMeta: Clone {}
impl<TM: Clone> TreeMeta for TM {}

/// Totally ordered operation timestamp.
pub trait Timestamp: Ord + Clone + Debug {}
impl<T: Ord + Clone + Debug> Timestamp for T {}

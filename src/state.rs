use log::debug;

use crate::engine::{apply_move, redo_move, undo_move};
use crate::op_move::{LogOpMove, OpMove};
use crate::tree::Tree;
use crate::{Timestamp, TreeId, TreeMeta};

/// A tree together with the log of moves that produced it.
///
/// The log is sorted by timestamp, and the tree always equals the result of
/// applying the logged moves in order to an empty tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State<ID, TM, T> {
    tree: Tree<ID, TM>,
    log: Vec<LogOpMove<ID, TM, T>>,
}

impl<ID, TM, T> Default for State<ID, TM, T> {
    fn default() -> Self {
        Self {
            tree: Tree::default(),
            log: Vec::new(),
        }
    }
}

impl<ID: TreeId, TM: TreeMeta, T: Timestamp> State<ID, TM, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a state from logged moves by inserting each one afresh.
    pub fn from_log<I>(log: I) -> Self
    where
        I: IntoIterator<Item = LogOpMove<ID, TM, T>>,
    {
        insert_all(log.into_iter().map(OpMove::from), None)
    }

    pub fn tree(&self) -> &Tree<ID, TM> {
        &self.tree
    }

    pub fn log(&self) -> &[LogOpMove<ID, TM, T>] {
        &self.log
    }

    /// Logged moves with a timestamp later than `after`.
    pub fn ops_after(&self, after: &T) -> &[LogOpMove<ID, TM, T>] {
        let start = self.log.partition_point(|l| l.timestamp() <= after);
        &self.log[start..]
    }

    /// In-place form of [`insert_move`].
    pub fn apply_op(&mut self, op: OpMove<ID, TM, T>) {
        let state = std::mem::take(self);
        *self = insert_move(op, state);
    }

    pub fn into_parts(self) -> (Tree<ID, TM>, Vec<LogOpMove<ID, TM, T>>) {
        (self.tree, self.log)
    }

    pub(crate) fn from_parts(tree: Tree<ID, TM>, log: Vec<LogOpMove<ID, TM, T>>) -> Self {
        Self { tree, log }
    }

    // A logged move with the same timestamp, child and requested parent.
    fn contains(&self, op: &OpMove<ID, TM, T>) -> bool {
        let start = self.log.partition_point(|l| l.timestamp() < op.timestamp());
        self.log[start..]
            .iter()
            .take_while(|l| l.timestamp() == op.timestamp())
            .any(|l| l.child_id() == op.child_id() && l.new_parent() == op.parent_id())
    }
}

/// Inserts `op` at its place in timestamp order.
///
/// Logged moves later than `op` are undone, newest first, then `op` is
/// applied, then the undone moves are redone oldest first so each is decided
/// against the tree as it stands at its own position in history. A move that
/// shares its timestamp with logged moves goes after them, unless one of them
/// moves the same child under the same parent, in which case it is a
/// redelivery and leaves the state as is.
pub fn insert_move<ID, TM, T>(op: OpMove<ID, TM, T>, state: State<ID, TM, T>) -> State<ID, TM, T>
where
    ID: TreeId,
    TM: TreeMeta,
    T: Timestamp,
{
    if state.contains(&op) {
        debug!("ignoring redelivered move at {:?}", op.timestamp());
        return state;
    }

    let (mut tree, mut log) = state.into_parts();
    let mut undone = Vec::new();
    while let Some(latest) = log.pop() {
        if latest.timestamp() <= op.timestamp() {
            log.push(latest);
            break;
        }
        tree = undo_move(tree, &latest);
        undone.push(latest);
    }

    if !undone.is_empty() {
        debug!(
            "move at {:?} arrived late, undoing {} logged moves",
            op.timestamp(),
            undone.len()
        );
    }

    let (tree, logged) = apply_move(tree, op);
    log.push(logged);

    undone
        .iter()
        .rev()
        .fold(State::from_parts(tree, log), redo_move)
}

/// Inserts every move in `ops`, in order, starting from `initial` or an
/// empty state.
pub fn insert_all<ID, TM, T, I>(ops: I, initial: Option<State<ID, TM, T>>) -> State<ID, TM, T>
where
    ID: TreeId,
    TM: TreeMeta,
    T: Timestamp,
    I: IntoIterator<Item = OpMove<ID, TM, T>>,
{
    ops.into_iter()
        .fold(initial.unwrap_or_default(), |state, op| insert_move(op, state))
}

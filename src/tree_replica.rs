use rand::distributions::{Distribution, Standard};

use crate::clock::Clock;
use crate::op_move::{LogOpMove, OpMove};
use crate::state::State;
use crate::tree::Tree;
use crate::{TreeId, TreeMeta};

/// One replica of the tree: an actor id, a Lamport clock and a [`State`].
///
/// Local moves are stamped with `tick()`; remote moves advance the clock so
/// that later local moves sort after everything this replica has seen.
pub struct TreeReplica<ID, TM, A> {
    actor_id: A,
    state: State<ID, TM, Clock<A>>,
    time: Clock<A>,
}

impl<ID, TM, A> TreeReplica<ID, TM, A>
where
    ID: TreeId,
    TM: TreeMeta,
    A: Ord + Clone + std::fmt::Debug,
    Standard: Distribution<A>,
{
    pub fn new() -> Self {
        Self::with_actor(rand::random::<A>())
    }
}

impl<ID, TM, A> Default for TreeReplica<ID, TM, A>
where
    ID: TreeId,
    TM: TreeMeta,
    A: Ord + Clone + std::fmt::Debug,
    Standard: Distribution<A>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<ID, TM, A> TreeReplica<ID, TM, A>
where
    ID: TreeId,
    TM: TreeMeta,
    A: Ord + Clone + std::fmt::Debug,
{
    pub fn with_actor(actor_id: A) -> Self {
        TreeReplica {
            time: Clock::new(actor_id.clone(), None),
            actor_id,
            state: State::new(),
        }
    }

    pub fn actor_id(&self) -> &A {
        &self.actor_id
    }

    pub fn state(&self) -> &State<ID, TM, Clock<A>> {
        &self.state
    }

    pub fn tree(&self) -> &Tree<ID, TM> {
        self.state.tree()
    }

    pub fn time(&self) -> &Clock<A> {
        &self.time
    }

    pub fn tick(&mut self) -> Clock<A> {
        self.time.tick()
    }

    /// A local move stamped with a fresh timestamp. Not applied yet.
    pub fn opmove(&mut self, parent: Option<ID>, metadata: TM, child: ID) -> OpMove<ID, TM, Clock<A>> {
        OpMove::new(self.tick(), parent, metadata, child)
    }

    pub fn apply_op(&mut self, op: OpMove<ID, TM, Clock<A>>) {
        self.time = self.time.merge(op.timestamp());
        self.state.apply_op(op);
    }

    pub fn apply_ops(&mut self, ops: &[OpMove<ID, TM, Clock<A>>]) {
        for op in ops {
            self.apply_op(op.clone());
        }
    }

    /// Applies moves received from another replica's log.
    pub fn apply_log_ops(&mut self, ops: &[LogOpMove<ID, TM, Clock<A>>]) {
        for logged in ops {
            self.apply_op(logged.op_move());
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    type Replica = TreeReplica<u64, String, u64>;

    #[test]
    fn test_random_actor() {
        let r1: Replica = TreeReplica::new();
        assert_eq!(r1.time().actor_id(), r1.actor_id());
        assert_eq!(r1.time().counter(), 0);

        let r2 = Replica::default();
        assert!(r2.state().log().is_empty());
        assert_eq!(r2.time().actor_id(), r2.actor_id());
    }

    #[test]
    fn test_remote_ops_advance_clock() {
        let mut r1 = Replica::with_actor(1);
        let mut r2 = Replica::with_actor(2);

        let ops: Vec<_> = (0..5).map(|i| r1.opmove(None, format!("n{}", i), i)).collect();
        r1.apply_ops(&ops);
        r2.apply_ops(&ops);

        assert_eq!(r2.time().counter(), 5);
        let local = r2.opmove(Some(0), "child".to_string(), 100);
        assert!(local.timestamp() > ops[4].timestamp());
        assert_eq!(*local.timestamp().actor_id(), 2);
    }

    #[test]
    fn test_concurrent_moves_converge() {
        let mut r1 = Replica::with_actor(1);
        let mut r2 = Replica::with_actor(2);

        let root = r1.opmove(None, "root".to_string(), 0);
        let a = r1.opmove(Some(0), "a".to_string(), 1);
        let b = r1.opmove(Some(0), "b".to_string(), 2);
        r1.apply_ops(&[root, a, b]);
        r2.apply_log_ops(r1.state().log());

        // concurrently: r1 moves a under b, r2 moves b under a.
        let m1 = r1.opmove(Some(2), "a".to_string(), 1);
        let m2 = r2.opmove(Some(1), "b".to_string(), 2);
        r1.apply_op(m1.clone());
        r2.apply_op(m2.clone());

        r1.apply_op(m2);
        r2.apply_op(m1);

        assert_eq!(r1.state(), r2.state());
        assert!(crate::is_acyclic(r1.tree()));
        // same counter, so the actor id decides: r1's move came first.
        assert_eq!(r1.tree().parent_of(&1).map(|(p, _)| *p), Some(2));
        assert_eq!(r1.tree().parent_of(&2).map(|(p, _)| *p), Some(0));
    }

    #[test]
    fn test_redelivered_log_is_idempotent() {
        let mut r1 = Replica::with_actor(1);
        let mut r2 = Replica::with_actor(2);

        let ops = vec![
            r1.opmove(None, "root".to_string(), 0),
            r1.opmove(Some(0), "x".to_string(), 1),
        ];
        r1.apply_ops(&ops);

        r2.apply_log_ops(r1.state().log());
        r2.apply_log_ops(r1.state().log());

        assert_eq!(r1.state(), r2.state());
        assert_eq!(r2.state().log().len(), 2);
    }
}

use serde::{Deserialize, Serialize};

/// Lamport timestamp tagged with the replica that issued it.
///
/// Clocks order by counter first and actor id second, so timestamps issued by
/// different replicas never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Clock<A> {
    counter: u64,
    actor_id: A,
}

impl<A: Clone + Ord> Clock<A> {
    pub fn new(actor_id: A, counter: Option<u64>) -> Self {
        Self {
            counter: counter.unwrap_or(0),
            actor_id,
        }
    }

    pub fn actor_id(&self) -> &A {
        &self.actor_id
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Advances the counter and returns the new timestamp.
    pub fn tick(&mut self) -> Self {
        self.counter += 1;
        self.clone()
    }

    /// Returns a clock for this actor that is at least as late as `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            counter: self.counter.max(other.counter),
            actor_id: self.actor_id.clone(),
        }
    }
}

//! JSON encoding of logged moves, as exchanged between replicas.
//!
//! A message is a list of records shaped like
//! `{"timestamp", "old_parent", "new_parent", "metadata", "child"}`.
//!
//! `old_parent` is the child's whole entry before the move,
//! `{"parent_id", "metadata", "child_id"}`, or null if the child did not
//! exist. `parent_id` is null when the child was a root, so undoing a move of
//! a root puts the root back instead of dropping it.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::op_move::LogOpMove;

pub fn encode_ops<ID, TM, T>(ops: &[LogOpMove<ID, TM, T>]) -> Result<String>
where
    ID: Serialize,
    TM: Serialize,
    T: Serialize,
{
    Ok(serde_json::to_string(ops)?)
}

pub fn encode_ops_to_vec<ID, TM, T>(ops: &[LogOpMove<ID, TM, T>]) -> Result<Vec<u8>>
where
    ID: Serialize,
    TM: Serialize,
    T: Serialize,
{
    Ok(serde_json::to_vec(ops)?)
}

pub fn decode_ops<ID, TM, T>(data: &str) -> Result<Vec<LogOpMove<ID, TM, T>>>
where
    ID: DeserializeOwned,
    TM: DeserializeOwned,
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(data)?)
}

pub fn decode_ops_from_slice<ID, TM, T>(data: &[u8]) -> Result<Vec<LogOpMove<ID, TM, T>>>
where
    ID: DeserializeOwned,
    TM: DeserializeOwned,
    T: DeserializeOwned,
{
    Ok(serde_json::from_slice(data)?)
}

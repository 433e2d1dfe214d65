use thiserror::Error;

/// Errors raised at the boundary with collaborators. Moves themselves never
/// fail: an illegal move is logged and otherwise ignored.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Malformed wire data: {0}")]
    Wire(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

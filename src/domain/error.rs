use thiserror::Error;

use super::todo::TodoId;

/// The two domain failures the handlers care about, plus a catch-all for
/// storage faults, which are unrecoverable at the request level.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("todo {0} not found")]
    NotFound(TodoId),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

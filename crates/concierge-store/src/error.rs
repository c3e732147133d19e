//! Error types for the concierge-store crate.
//!
//! All store operations return [`StoreError`] via [`StoreResult`].
//! "Not found" is deliberately *not* an error here: `update` returns `None`
//! and `delete` returns `false` when the id is absent.

use thiserror::Error;

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the in-memory stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An invalid argument was provided to a store operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A freshly generated id collided with an existing record.
    #[error("{entity} id collision: {id}")]
    DuplicateId { entity: &'static str, id: String },
}

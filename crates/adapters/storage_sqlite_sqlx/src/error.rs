//! Storage-specific error type wrapping sqlx errors.

/// Errors originating from the `SQLite` engine adapter.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query, connection or transaction operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The session transaction was already committed or rolled back.
    #[error("session transaction already finished")]
    SessionFinished,
}

//! Common error types used across the workspace.
//!
//! [`ConnectionError`] is the single error surfaced by the connection
//! lifecycle manager. Every variant that stems from a lower-level failure
//! keeps that failure as its [`source`](std::error::Error::source).

/// Type-erased error used at port boundaries and inside session scopes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while opening, using or closing a database connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// `open_connection` was called while a connection already exists.
    #[error("connection to the database already exists")]
    AlreadyConnected,

    /// A session or schema operation was requested without a connection.
    #[error("there is no existing connection to the database")]
    NotConnected,

    /// The engine handle could not be constructed.
    #[error("the error '{source}' was raised while trying to open a connection to the database")]
    Open {
        #[source]
        source: BoxError,
    },

    /// A session could not be started on the engine.
    #[error("failed to begin a database session: {source}")]
    Begin {
        #[source]
        source: BoxError,
    },

    /// The body of a session scope failed; the session was rolled back.
    #[error("the error '{source}' was raised while using a database session")]
    Scope {
        #[source]
        source: BoxError,
    },

    /// The session body succeeded but the commit failed.
    #[error("failed to commit database session: {source}")]
    Commit {
        #[source]
        source: BoxError,
    },

    /// Creating the registered tables failed.
    #[error("failed to create tables: {source}")]
    Schema {
        #[source]
        source: BoxError,
    },
}

impl ConnectionError {
    /// Whether this error wraps a failure returned by a session scope body,
    /// as opposed to a failure of the database infrastructure itself.
    #[must_use]
    pub fn is_scope_failure(&self) -> bool {
        matches!(self, Self::Scope { .. })
    }

    /// Recover the original error returned by a session scope body.
    ///
    /// Returns `None` for every other variant.
    #[must_use]
    pub fn into_scope_source(self) -> Option<BoxError> {
        match self {
            Self::Scope { source } => Some(source),
            _ => None,
        }
    }
}

/// Errors raised when describing or registering entity schemas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A table schema was built without a name.
    #[error("table name must not be empty")]
    EmptyTableName,

    /// A table schema was built without any column.
    #[error("table '{table}' must declare at least one column")]
    NoColumns { table: String },

    /// A column was declared without a name.
    #[error("table '{table}' declares a column with an empty name")]
    EmptyColumnName { table: String },

    /// The same column name was declared twice.
    #[error("table '{table}' declares column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },

    /// A different schema is already registered under this table name.
    #[error("a different schema is already registered for table '{table}'")]
    ConflictingTable { table: String },

    /// An entity describes a table other than the one it is named after.
    #[error("entity table '{expected}' describes its schema as table '{found}'")]
    TableNameMismatch { expected: String, found: String },
}

//! # dbmanager-adapter-storage-sqlite-sqlx
//!
//! `SQLite` engine adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the engine and session ports defined in `dbmanager-app::ports`
//! - Manage the `SQLite` connection pool lifecycle (open, dispose)
//! - Back each session with a pooled connection and an open transaction
//! - Render `CREATE TABLE` statements for the registered entity schemas
//!
//! ## Dependency rule
//! Depends on `dbmanager-app` (for port traits) and `dbmanager-domain` (for
//! schemas and errors). The `app` and `domain` crates must never reference
//! this adapter.

pub mod ddl;
pub mod error;
pub mod pool;
pub mod session;

use dbmanager_app::services::DatabaseManager;

pub use error::StorageError;
pub use pool::{SqliteEngine, SqliteEngineFactory};
pub use session::SqliteSession;

/// Database manager driving a `SQLite` pool.
pub type SqliteDatabaseManager = DatabaseManager<SqliteEngineFactory>;

/// Create a disconnected [`SqliteDatabaseManager`] with an empty registry.
#[must_use]
pub fn manager() -> SqliteDatabaseManager {
    DatabaseManager::new(SqliteEngineFactory)
}

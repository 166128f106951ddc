//! `SQLite` connection pool — the engine handle behind a database manager.

use std::future::Future;
use std::str::FromStr;

use log::LevelFilter;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};

use dbmanager_app::ports::{Engine, EngineFactory, EngineOptions};
use dbmanager_domain::error::BoxError;
use dbmanager_domain::registry::EntityRegistry;

use crate::ddl;
use crate::error::StorageError;
use crate::session::SqliteSession;

/// Builds [`SqliteEngine`]s from `sqlx` `SQLite` URLs
/// (e.g. `sqlite:app.db?mode=rwc` or `sqlite::memory:`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteEngineFactory;

impl EngineFactory for SqliteEngineFactory {
    type Engine = SqliteEngine;

    fn create(
        &self,
        url: &str,
        options: &EngineOptions,
    ) -> impl Future<Output = Result<SqliteEngine, BoxError>> + Send {
        let connect = connect_options(url, options.echo);
        let pool_options = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout);

        async move {
            let pool = pool_options
                .connect_with(connect?)
                .await
                .map_err(StorageError::from)?;

            Ok(SqliteEngine { pool })
        }
    }
}

/// Parse `url` and apply statement logging.
///
/// The database file is created if missing. With `echo` every statement is
/// logged at `INFO`; without it statement logging is turned off.
fn connect_options(url: &str, echo: bool) -> Result<SqliteConnectOptions, StorageError> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    Ok(if echo {
        options.log_statements(LevelFilter::Info)
    } else {
        options.disable_statement_logging()
    })
}

/// Holds the `SQLite` connection pool and provides access to it.
pub struct SqliteEngine {
    pool: SqlitePool,
}

impl SqliteEngine {
    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Engine for SqliteEngine {
    type Session = SqliteSession;

    fn begin(&self) -> impl Future<Output = Result<SqliteSession, BoxError>> + Send {
        let pool = self.pool.clone();
        async move {
            let transaction = pool.begin().await.map_err(StorageError::from)?;
            Ok(SqliteSession::new(transaction))
        }
    }

    fn create_tables(
        &self,
        registry: &EntityRegistry,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        let statements: Vec<String> = registry.tables().map(ddl::create_table).collect();
        let pool = self.pool.clone();
        async move {
            let mut transaction = pool.begin().await.map_err(StorageError::from)?;
            for statement in &statements {
                sqlx::query(statement)
                    .execute(&mut *transaction)
                    .await
                    .map_err(StorageError::from)?;
            }
            transaction.commit().await.map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn dispose(self) -> impl Future<Output = ()> + Send {
        async move { self.pool.close().await }
    }
}

//! `SQLite` session — one pooled connection with an open transaction.

use std::future::Future;

use sqlx::{Sqlite, SqliteConnection, Transaction};

use dbmanager_app::ports::Session;
use dbmanager_domain::error::BoxError;

use crate::error::StorageError;

/// Session handed to the body of a session scope.
///
/// Statements are executed through [`connection`](Self::connection) and
/// become visible to other sessions once the scope commits.
pub struct SqliteSession {
    transaction: Option<Transaction<'static, Sqlite>>,
}

impl SqliteSession {
    pub(crate) fn new(transaction: Transaction<'static, Sqlite>) -> Self {
        Self {
            transaction: Some(transaction),
        }
    }

    /// Connection to run statements on, inside the session transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::SessionFinished`] once the transaction has been
    /// committed or rolled back.
    pub fn connection(&mut self) -> Result<&mut SqliteConnection, StorageError> {
        self.transaction
            .as_deref_mut()
            .ok_or(StorageError::SessionFinished)
    }

    /// Whether the session transaction is still open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.transaction.is_some()
    }
}

impl Session for SqliteSession {
    fn commit(&mut self) -> impl Future<Output = Result<(), BoxError>> + Send {
        let transaction = self.transaction.take();
        async move {
            let transaction = transaction.ok_or(StorageError::SessionFinished)?;
            transaction.commit().await.map_err(StorageError::from)?;
            Ok(())
        }
    }

    fn rollback(&mut self) -> impl Future<Output = Result<(), BoxError>> + Send {
        let transaction = self.transaction.take();
        async move {
            let transaction = transaction.ok_or(StorageError::SessionFinished)?;
            transaction.rollback().await.map_err(StorageError::from)?;
            Ok(())
        }
    }

    fn close(self) -> impl Future<Output = ()> + Send {
        async move {
            if let Some(transaction) = self.transaction {
                if let Err(err) = transaction.rollback().await {
                    tracing::warn!(%err, "failed to roll back unfinished session on close");
                }
            }
        }
    }
}

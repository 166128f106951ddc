//! Database manager — owns the engine handle and scopes sessions.

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::Instrument;

use dbmanager_domain::error::{BoxError, ConnectionError};
use dbmanager_domain::id::SessionId;
use dbmanager_domain::registry::EntityRegistry;

use crate::ports::{Engine, EngineFactory, EngineOptions, Session, SessionOf};

/// Connection lifecycle manager.
///
/// Starts disconnected. [`open_connection`](Self::open_connection) creates the
/// engine handle, [`close_connection`](Self::close_connection) disposes it.
/// In between, [`get_session`](Self::get_session) runs units of work that are
/// committed on success and rolled back on failure.
pub struct DatabaseManager<F: EngineFactory> {
    factory: F,
    engine: Option<F::Engine>,
    registry: EntityRegistry,
}

impl<F: EngineFactory> DatabaseManager<F> {
    /// Create a disconnected manager with an empty registry.
    pub fn new(factory: F) -> Self {
        Self::with_registry(factory, EntityRegistry::new())
    }

    /// Create a disconnected manager that creates the tables of `registry`.
    pub fn with_registry(factory: F, registry: EntityRegistry) -> Self {
        Self {
            factory,
            engine: None,
            registry,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.engine.is_some()
    }

    /// Tables created by [`init_tables`](Self::init_tables).
    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Mutable access to the registry, to register entities before
    /// [`init_tables`](Self::init_tables).
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    /// Open a connection to `url` with default engine options.
    ///
    /// `echo` turns on logging of every statement sent to the database.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::AlreadyConnected`] if a connection exists,
    /// or [`ConnectionError::Open`] if the engine handle cannot be built.
    pub async fn open_connection(&mut self, url: &str, echo: bool) -> Result<(), ConnectionError> {
        self.open_connection_with(url, EngineOptions::with_echo(echo)).await
    }

    /// Open a connection to `url` with explicit engine options.
    ///
    /// # Errors
    ///
    /// Same as [`open_connection`](Self::open_connection). On error the
    /// manager state is left unchanged.
    #[tracing::instrument(skip_all, fields(echo = options.echo))]
    pub async fn open_connection_with(
        &mut self,
        url: &str,
        options: EngineOptions,
    ) -> Result<(), ConnectionError> {
        if self.engine.is_some() {
            return Err(ConnectionError::AlreadyConnected);
        }

        let engine = self
            .factory
            .create(url, &options)
            .await
            .map_err(|source| ConnectionError::Open { source })?;
        self.engine = Some(engine);

        tracing::info!("database connection opened");
        Ok(())
    }

    /// Run `body` inside a new session.
    ///
    /// The session is committed when `body` returns `Ok` and rolled back when
    /// it returns `Err` or panics. It is closed exactly once on every path
    /// before this method returns. A panic is resumed after the session is
    /// closed.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::NotConnected`] without an open connection
    /// - [`ConnectionError::Begin`] if the session cannot start
    /// - [`ConnectionError::Scope`] wrapping the error returned by `body`
    /// - [`ConnectionError::Commit`] if `body` succeeded but the commit failed
    pub async fn get_session<T, B>(&self, body: B) -> Result<T, ConnectionError>
    where
        T: Send,
        B: for<'s> FnOnce(&'s mut SessionOf<F>) -> BoxFuture<'s, Result<T, BoxError>> + Send,
    {
        let engine = self.engine.as_ref().ok_or(ConnectionError::NotConnected)?;
        let session_id = SessionId::new();

        run_scope(engine, body)
            .instrument(tracing::debug_span!("session", %session_id))
            .await
    }

    /// Create every registered table that does not exist yet.
    ///
    /// Does nothing while disconnected.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Schema`] if table creation fails.
    #[tracing::instrument(skip(self), fields(tables = self.registry.len()))]
    pub async fn init_tables(&self) -> Result<(), ConnectionError> {
        let Some(engine) = &self.engine else {
            tracing::debug!("not connected, skipping table creation");
            return Ok(());
        };

        engine
            .create_tables(&self.registry)
            .await
            .map_err(|source| ConnectionError::Schema { source })?;

        tracing::debug!("tables created");
        Ok(())
    }

    /// Dispose the engine handle if any. Calling it while disconnected is a
    /// no-op.
    #[tracing::instrument(skip(self))]
    pub async fn close_connection(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.dispose().await;
            tracing::info!("database connection closed");
        }
    }
}

async fn run_scope<E, T, B>(engine: &E, body: B) -> Result<T, ConnectionError>
where
    E: Engine,
    B: for<'s> FnOnce(&'s mut E::Session) -> BoxFuture<'s, Result<T, BoxError>>,
{
    let mut session = engine
        .begin()
        .await
        .map_err(|source| ConnectionError::Begin { source })?;

    let outcome = AssertUnwindSafe(body(&mut session)).catch_unwind().await;

    let result = match outcome {
        Ok(Ok(value)) => match session.commit().await {
            Ok(()) => {
                tracing::debug!("session committed");
                Ok(value)
            }
            Err(source) => Err(ConnectionError::Commit { source }),
        },
        Ok(Err(source)) => {
            rollback_quietly(&mut session).await;
            Err(ConnectionError::Scope { source })
        }
        Err(payload) => {
            rollback_quietly(&mut session).await;
            session.close().await;
            std::panic::resume_unwind(payload);
        }
    };

    session.close().await;
    result
}

async fn rollback_quietly<S: Session>(session: &mut S) {
    match session.rollback().await {
        Ok(()) => tracing::debug!("session rolled back"),
        Err(err) => tracing::warn!(%err, "failed to roll back session"),
    }
}

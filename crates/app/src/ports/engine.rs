//! Engine port — the database library the connection manager delegates to.
//!
//! An [`EngineFactory`] turns a connection string into an [`Engine`] (the
//! engine handle). An engine starts [`Session`]s, creates the registered
//! tables and is disposed when the connection closes.

use std::future::Future;
use std::time::Duration;

use dbmanager_domain::error::BoxError;
use dbmanager_domain::registry::EntityRegistry;

/// Options applied when an engine handle is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Log every statement sent to the database.
    pub echo: bool,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long `begin` may wait for a pooled connection.
    pub acquire_timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            echo: false,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl EngineOptions {
    /// Default options with statement logging turned on or off.
    #[must_use]
    pub fn with_echo(echo: bool) -> Self {
        Self {
            echo,
            ..Self::default()
        }
    }
}

/// Builds engine handles from connection strings.
pub trait EngineFactory: Send + Sync {
    type Engine: Engine;

    /// Create an engine handle for `url`.
    ///
    /// The URL format belongs to the implementation; any failure to parse
    /// it or to reach the database is returned as-is.
    fn create(
        &self,
        url: &str,
        options: &EngineOptions,
    ) -> impl Future<Output = Result<Self::Engine, BoxError>> + Send;
}

/// A configured, reusable handle on a database.
pub trait Engine: Send + Sync {
    type Session: Session;

    /// Start a new session with an open transaction.
    fn begin(&self) -> impl Future<Output = Result<Self::Session, BoxError>> + Send;

    /// Create every table in `registry` that does not exist yet.
    fn create_tables(
        &self,
        registry: &EntityRegistry,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Release every resource held by the handle.
    fn dispose(self) -> impl Future<Output = ()> + Send;
}

/// A unit of work bound to an [`Engine`].
///
/// The connection manager calls either [`commit`](Self::commit) or
/// [`rollback`](Self::rollback) at most once, then always
/// [`close`](Self::close).
pub trait Session: Send {
    /// Make the staged changes permanent.
    fn commit(&mut self) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Discard the staged changes.
    fn rollback(&mut self) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Release the session's connection.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Session type produced by the engines of factory `F`.
pub type SessionOf<F> = <<F as EngineFactory>::Engine as Engine>::Session;

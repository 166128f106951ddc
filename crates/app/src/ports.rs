//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the connection manager and the database
//! library. They are defined here (in `app`) so that the manager and the
//! adapters can both depend on them without creating circular dependencies.

pub mod engine;

pub use engine::{Engine, EngineFactory, EngineOptions, Session, SessionOf};

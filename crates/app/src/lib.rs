//! # dbmanager-app
//!
//! Application layer — the connection lifecycle manager and the **port
//! definitions** (traits) it drives.
//!
//! ## Responsibilities
//! - Define the driven ports adapters must implement:
//!   - `EngineFactory` — build an engine handle from a connection string
//!   - `Engine` — begin sessions, create tables, dispose
//!   - `Session` — commit, roll back, close
//! - Provide `DatabaseManager`, the Disconnected/Connected state machine that
//!   scopes sessions (commit on success, rollback on failure, close always)
//!
//! ## Dependency rule
//! Depends on `dbmanager-domain` only (plus `futures` for boxed scope futures).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;

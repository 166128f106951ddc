//! # dbmanager-domain
//!
//! Persistence contracts shared by every dbmanager crate.
//!
//! ## Responsibilities
//! - Define the [`Entity`](entity::Entity) capability and the table
//!   description it contributes ([`TableSchema`](entity::TableSchema))
//! - Hold the explicit [`EntityRegistry`](registry::EntityRegistry) consumed
//!   when creating tables
//! - Define the [`EntityModel`](model::EntityModel) conversion contract
//! - Define [`ConnectionError`](error::ConnectionError), the single error
//!   kind of the connection lifecycle
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Engine and session ports live in the `app` crate.

pub mod entity;
pub mod error;
pub mod id;
pub mod model;
pub mod registry;

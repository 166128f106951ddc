//! Application services orchestrating the engine ports.

pub mod database_manager;

pub use database_manager::DatabaseManager;

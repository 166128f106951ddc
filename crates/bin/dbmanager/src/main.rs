//! # dbmanager — connection smoke check
//!
//! Composition root that wires the `SQLite` adapter into the connection
//! manager and verifies that a session can be opened and committed.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise structured logging
//! - Open the engine, create the registered tables and run one session
//! - Close the connection on every path
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use dbmanager_domain::error::BoxError;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config)?;

    let mut db = dbmanager_adapter_storage_sqlite_sqlx::manager();
    db.open_connection_with(config.database_url(), config.engine_options()).await?;

    let outcome = smoke_check(&db).await;
    db.close_connection().await;
    outcome?;

    tracing::info!("database connection and session implemented correctly");
    Ok(())
}

async fn smoke_check(
    db: &dbmanager_adapter_storage_sqlite_sqlx::SqliteDatabaseManager,
) -> Result<(), Box<dyn std::error::Error>> {
    db.init_tables().await?;

    let one = db
        .get_session(|session| {
            Box::pin(async move {
                let (one,): (i64,) = sqlx::query_as("SELECT 1")
                    .fetch_one(session.connection()?)
                    .await?;
                Ok::<_, BoxError>(one)
            })
        })
        .await?;
    tracing::debug!(one, "session round-trip");

    Ok(())
}

fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut filter = EnvFilter::new(&config.logging.filter);
    if config.database.echo {
        filter = filter.add_directive("sqlx::query=info".parse()?);
    }

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

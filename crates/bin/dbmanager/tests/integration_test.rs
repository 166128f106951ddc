//! End-to-end tests for the full dbmanager stack.
//!
//! Each test opens a real connection manager over an in-memory `SQLite`
//! database, registers an entity, and drives sessions through the
//! `sqlx` adapter.

use std::sync::Arc;
use std::time::Duration;

use dbmanager_adapter_storage_sqlite_sqlx::{SqliteDatabaseManager, SqliteSession, manager};
use dbmanager_domain::entity::{ColumnDef, ColumnType, Entity, TableSchema};
use dbmanager_domain::error::{BoxError, ConnectionError};
use dbmanager_domain::model::EntityModel;

const MEMORY_URL: &str = "sqlite::memory:";

// ---------------------------------------------------------------------------
// Entity and model under test
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct UserRow {
    id: i64,
    name: String,
    email: Option<String>,
    active: bool,
}

impl Entity for UserRow {
    const TABLE_NAME: &'static str = "users";

    fn schema() -> TableSchema {
        TableSchema {
            name: Self::TABLE_NAME.to_string(),
            columns: vec![
                ColumnDef::new("id", ColumnType::Integer).primary_key(),
                ColumnDef::new("name", ColumnType::Text),
                ColumnDef::new("email", ColumnType::Text).nullable(),
                ColumnDef::new("active", ColumnType::Boolean),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Contact {
    None,
    Email(String),
}

#[derive(Debug, Clone, PartialEq)]
struct User {
    id: i64,
    display_name: String,
    contact: Contact,
    suspended: bool,
}

impl EntityModel<UserRow> for User {
    fn to_entity(&self) -> UserRow {
        UserRow {
            id: self.id,
            name: self.display_name.clone(),
            email: match &self.contact {
                Contact::None => None,
                Contact::Email(address) => Some(address.clone()),
            },
            active: !self.suspended,
        }
    }

    fn from_entity(entity: UserRow) -> Self {
        Self {
            id: entity.id,
            display_name: entity.name,
            contact: entity.email.map_or(Contact::None, Contact::Email),
            suspended: !entity.active,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("deliberate failure inside the scope")]
struct DeliberateError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a connected manager with the `users` table created.
async fn connected() -> SqliteDatabaseManager {
    let mut db = manager();
    db.registry_mut().register::<UserRow>().unwrap();
    db.open_connection(MEMORY_URL, false).await.unwrap();
    db.init_tables().await.unwrap();
    db
}

fn ada() -> User {
    User {
        id: 1,
        display_name: "Ada".to_string(),
        contact: Contact::Email("ada@example.com".to_string()),
        suspended: false,
    }
}

async fn insert_user(session: &mut SqliteSession, row: &UserRow) -> Result<(), BoxError> {
    sqlx::query("INSERT INTO users (id, name, email, active) VALUES (?, ?, ?, ?)")
        .bind(row.id)
        .bind(&row.name)
        .bind(&row.email)
        .bind(row.active)
        .execute(session.connection()?)
        .await?;
    Ok(())
}

async fn fetch_users(session: &mut SqliteSession) -> Result<Vec<UserRow>, BoxError> {
    let rows: Vec<(i64, String, Option<String>, bool)> =
        sqlx::query_as("SELECT id, name, email, active FROM users ORDER BY id")
            .fetch_all(session.connection()?)
            .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, email, active)| UserRow {
            id,
            name,
            email,
            active,
        })
        .collect())
}

async fn all_users(db: &SqliteDatabaseManager) -> Vec<UserRow> {
    db.get_session(|session| {
        Box::pin(async move {
            let rows = fetch_users(session).await?;
            Ok::<_, BoxError>(rows)
        })
    })
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Session scopes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_read_back_record_inserted_in_previous_session() {
    let db = connected().await;
    let row = ada().to_entity();

    db.get_session(move |session| {
        Box::pin(async move {
            insert_user(session, &row).await?;
            Ok::<_, BoxError>(())
        })
    })
    .await
    .unwrap();

    let users = all_users(&db).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Ada");
    assert_eq!(users[0].email.as_deref(), Some("ada@example.com"));
    assert!(users[0].active);
    assert_eq!(User::from_entity(users[0].clone()), ada());
}

#[tokio::test]
async fn should_leave_no_partial_effects_when_scope_fails() {
    let db = connected().await;
    let row = ada().to_entity();

    let err = db
        .get_session(move |session| {
            Box::pin(async move {
                insert_user(session, &row).await?;
                Err::<(), BoxError>(Box::new(DeliberateError))
            })
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("deliberate failure inside the scope"));
    let source = err.into_scope_source().unwrap();
    assert!(source.downcast_ref::<DeliberateError>().is_some());

    assert!(all_users(&db).await.is_empty());
}

#[tokio::test]
async fn should_roll_back_earlier_statements_when_database_rejects_later_one() {
    let db = connected().await;
    let first = ada().to_entity();
    let duplicate = UserRow {
        name: "Impostor".to_string(),
        ..first.clone()
    };
    let second = UserRow {
        id: 2,
        name: "Grace".to_string(),
        email: None,
        active: true,
    };

    let err = db
        .get_session(move |session| {
            Box::pin(async move {
                insert_user(session, &second).await?;
                insert_user(session, &first).await?;
                insert_user(session, &duplicate).await?;
                Ok::<_, BoxError>(())
            })
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectionError::Scope { .. }));
    assert!(all_users(&db).await.is_empty());
}

#[tokio::test]
async fn should_return_scope_value_when_committed() {
    let db = connected().await;
    let row = ada().to_entity();

    let inserted_id = db
        .get_session(move |session| {
            Box::pin(async move {
                insert_user(session, &row).await?;
                Ok::<_, BoxError>(row.id)
            })
        })
        .await
        .unwrap();

    assert_eq!(inserted_id, 1);
}

#[tokio::test]
async fn should_run_two_scopes_at_once_on_one_manager() {
    let db = connected().await;
    // each scope holds its transaction open until the other one has begun
    let barrier = Arc::new(tokio::sync::Barrier::new(2));

    let scope = |barrier: Arc<tokio::sync::Barrier>| {
        db.get_session(move |session| {
            Box::pin(async move {
                let users = fetch_users(session).await?;
                barrier.wait().await;
                Ok::<_, BoxError>(users.len())
            })
        })
    };

    let (first, second) = tokio::time::timeout(Duration::from_secs(10), async {
        tokio::join!(scope(Arc::clone(&barrier)), scope(Arc::clone(&barrier)))
    })
    .await
    .expect("scopes should overlap instead of running one after the other");

    assert_eq!(first.unwrap(), 0);
    assert_eq!(second.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Connection lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_keep_original_handle_when_opened_twice() {
    let mut db = connected().await;
    let row = ada().to_entity();
    db.get_session(move |session| {
        Box::pin(async move {
            insert_user(session, &row).await?;
            Ok::<_, BoxError>(())
        })
    })
    .await
    .unwrap();

    let result = db.open_connection(MEMORY_URL, false).await;

    assert!(matches!(result, Err(ConnectionError::AlreadyConnected)));
    // a fresh in-memory database would be empty
    assert_eq!(all_users(&db).await.len(), 1);
}

#[tokio::test]
async fn should_fail_with_not_connected_after_close() {
    let mut db = connected().await;
    db.close_connection().await;

    let result = db
        .get_session(|_session| Box::pin(async { Ok::<_, BoxError>(()) }))
        .await;

    assert!(matches!(result, Err(ConnectionError::NotConnected)));
}

#[tokio::test]
async fn should_fail_with_not_connected_before_open() {
    let db = manager();

    let result = db
        .get_session(|_session| Box::pin(async { Ok::<_, BoxError>(()) }))
        .await;

    assert!(matches!(result, Err(ConnectionError::NotConnected)));
}

#[tokio::test]
async fn should_not_fail_when_closing_twice_or_never_opened() {
    let mut never_opened = manager();
    never_opened.close_connection().await;

    let mut db = connected().await;
    db.close_connection().await;
    db.close_connection().await;
    assert!(!db.is_connected());
}

#[tokio::test]
async fn should_chain_driver_error_when_url_is_malformed() {
    let mut db = manager();

    let err = db
        .open_connection("sqlite::memory:?mode=bogus", false)
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectionError::Open { .. }));
    assert!(std::error::Error::source(&err).is_some());
    assert!(!db.is_connected());
}

#[tokio::test]
async fn should_skip_table_creation_before_open() {
    let mut db = manager();
    db.registry_mut().register::<UserRow>().unwrap();

    db.init_tables().await.unwrap();

    assert!(!db.is_connected());
}

// ---------------------------------------------------------------------------
// Model conversion
// ---------------------------------------------------------------------------

#[test]
fn should_reproduce_entity_through_model() {
    let rows = [
        ada().to_entity(),
        UserRow {
            id: 3,
            name: "Linus".to_string(),
            email: None,
            active: false,
        },
    ];

    for row in rows {
        assert_eq!(User::from_entity(row.clone()).to_entity(), row);
    }
}

//! Explicit registry of the entity tables known to a database manager.

use crate::entity::{Entity, TableSchema};
use crate::error::SchemaError;

/// Ordered collection of [`TableSchema`]s consumed by `init_tables`.
///
/// Tables are kept in registration order. Registering the same schema twice
/// is a no-op.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    tables: Vec<TableSchema>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the table of entity `E`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the schema of `E` is invalid, is not
    /// named [`E::TABLE_NAME`](Entity::TABLE_NAME), or if a different schema
    /// is already registered under the same table name.
    pub fn register<E: Entity>(&mut self) -> Result<&mut Self, SchemaError> {
        let schema = E::schema();
        if schema.name != E::TABLE_NAME {
            return Err(SchemaError::TableNameMismatch {
                expected: E::TABLE_NAME.to_string(),
                found: schema.name,
            });
        }
        self.register_schema(schema)
    }

    /// Register a table schema directly.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub fn register_schema(&mut self, schema: TableSchema) -> Result<&mut Self, SchemaError> {
        schema.validate()?;
        match self.tables.iter().find(|t| t.name == schema.name) {
            Some(existing) if *existing == schema => {}
            Some(_) => {
                return Err(SchemaError::ConflictingTable { table: schema.name });
            }
            None => self.tables.push(schema),
        }
        Ok(self)
    }

    /// Whether a table named `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name == name)
    }

    /// Registered schemas, in registration order.
    pub fn tables(&self) -> impl ExactSizeIterator<Item = &TableSchema> {
        self.tables.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

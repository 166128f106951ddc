//! Entity — the persistence-side record type.
//!
//! An entity is a record stored in one database table. The only capability
//! the workspace requires from it is a description of that table, so that
//! it can be added to an [`EntityRegistry`](crate::registry::EntityRegistry)
//! and created by `init_tables`.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A persistable record backed by a single table.
pub trait Entity: Send + Sync + 'static {
    /// Name of the table holding this entity.
    const TABLE_NAME: &'static str;

    /// Describe the table. The returned schema must be named
    /// [`TABLE_NAME`](Self::TABLE_NAME); registration rejects it otherwise.
    fn schema() -> TableSchema;
}

/// Storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Blob,
    Boolean,
}

/// A single column of a [`TableSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnDef {
    /// A non-nullable, non-key column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            primary_key: false,
        }
    }

    /// Allow `NULL` values in this column.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Make this column part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}

/// Table description contributed by an [`Entity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Create a builder for a table named `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> TableSchemaBuilder {
        TableSchemaBuilder {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Columns flagged as primary key, in declaration order.
    pub fn primary_key(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|col| col.primary_key)
    }

    /// Check schema invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] when the table name is empty, no column is
    /// declared, or a column name is empty or repeated.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyTableName);
        }
        if self.columns.is_empty() {
            return Err(SchemaError::NoColumns {
                table: self.name.clone(),
            });
        }
        for (index, column) in self.columns.iter().enumerate() {
            if column.name.is_empty() {
                return Err(SchemaError::EmptyColumnName {
                    table: self.name.clone(),
                });
            }
            if self.columns[..index].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`TableSchema`].
#[derive(Debug)]
pub struct TableSchemaBuilder {
    name: String,
    columns: Vec<ColumnDef>,
}

impl TableSchemaBuilder {
    #[must_use]
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Consume the builder, validate, and return a [`TableSchema`].
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the schema breaks an invariant, see
    /// [`TableSchema::validate`].
    pub fn build(self) -> Result<TableSchema, SchemaError> {
        let schema = TableSchema {
            name: self.name,
            columns: self.columns,
        };
        schema.validate()?;
        Ok(schema)
    }
}

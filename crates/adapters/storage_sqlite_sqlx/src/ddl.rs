//! `SQLite` DDL rendering for registered table schemas.

use dbmanager_domain::entity::{ColumnDef, ColumnType, TableSchema};

/// Render a `CREATE TABLE IF NOT EXISTS` statement for `schema`.
#[must_use]
pub fn create_table(schema: &TableSchema) -> String {
    tracing::debug!(
        table = %schema.name,
        columns = schema.columns.len(),
        "rendering CREATE TABLE"
    );

    let mut parts: Vec<String> = schema
        .columns
        .iter()
        .map(|col| format!("  {}", column_def(col)))
        .collect();

    let keys: Vec<String> = schema
        .primary_key()
        .map(|col| quote_identifier(&col.name))
        .collect();
    if !keys.is_empty() {
        parts.push(format!("  PRIMARY KEY ({})", keys.join(", ")));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        quote_identifier(&schema.name),
        parts.join(",\n")
    )
}

fn column_def(col: &ColumnDef) -> String {
    let mut def = format!("{} {}", quote_identifier(&col.name), sql_type(col.column_type));
    if !col.nullable {
        def.push_str(" NOT NULL");
    }
    def
}

fn sql_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Integer => "INTEGER",
        ColumnType::Real => "REAL",
        ColumnType::Text => "TEXT",
        ColumnType::Blob => "BLOB",
        ColumnType::Boolean => "BOOLEAN",
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_create_table_with_primary_key() {
        let schema = TableSchema::builder("users")
            .column(ColumnDef::new("id", ColumnType::Integer).primary_key())
            .column(ColumnDef::new("name", ColumnType::Text))
            .column(ColumnDef::new("email", ColumnType::Text).nullable())
            .build()
            .unwrap();

        assert_eq!(
            create_table(&schema),
            "CREATE TABLE IF NOT EXISTS \"users\" (\n  \"id\" INTEGER NOT NULL,\n  \"name\" TEXT NOT NULL,\n  \"email\" TEXT,\n  PRIMARY KEY (\"id\")\n)"
        );
    }

    #[test]
    fn should_render_composite_primary_key() {
        let schema = TableSchema::builder("memberships")
            .column(ColumnDef::new("user_id", ColumnType::Integer).primary_key())
            .column(ColumnDef::new("group_id", ColumnType::Integer).primary_key())
            .build()
            .unwrap();

        let sql = create_table(&schema);
        assert!(sql.contains("\"user_id\" INTEGER NOT NULL"));
        assert!(sql.contains("\"group_id\" INTEGER NOT NULL"));
        assert!(sql.contains("PRIMARY KEY (\"user_id\", \"group_id\")"));
    }

    #[test]
    fn should_omit_primary_key_clause_when_none_declared() {
        let schema = TableSchema::builder("log")
            .column(ColumnDef::new("line", ColumnType::Blob))
            .build()
            .unwrap();

        assert_eq!(
            create_table(&schema),
            "CREATE TABLE IF NOT EXISTS \"log\" (\n  \"line\" BLOB NOT NULL\n)"
        );
    }

    #[test]
    fn should_escape_quotes_in_identifiers() {
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn should_map_every_column_type() {
        assert_eq!(sql_type(ColumnType::Real), "REAL");
        assert_eq!(sql_type(ColumnType::Boolean), "BOOLEAN");
        assert_eq!(sql_type(ColumnType::Integer), "INTEGER");
    }
}

use crate::schema::{ColumnType, TableSchema};

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let sql_type = match col.col_type {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "INTEGER",
            ColumnType::Json => "TEXT",
        };

        let null_constraint = if !col.nullable && !col.is_primary_key() {
            " NOT NULL"
        } else {
            ""
        };
        let pk = if col.is_primary_key() { " PRIMARY KEY" } else { "" };

        columns.push(format!(
            "    {} {}{}{}",
            col.name, sql_type, pk, null_constraint
        ));
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for declared indexes and foreign key columns
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let declared = schema.indexes.iter().map(|index| {
        let kind = if index.unique { "UNIQUE INDEX" } else { "INDEX" };
        let prefix = if index.unique { "uq" } else { "idx" };
        format!(
            "CREATE {} IF NOT EXISTS {}_{}_{} ON {}({})",
            kind,
            prefix,
            schema.name,
            index.columns.join("_"),
            schema.name,
            index.columns.join(", ")
        )
    });

    // A declared index led by the FK column already covers it
    let foreign = schema
        .foreign_keys
        .iter()
        .filter(|fk| {
            !schema
                .indexes
                .iter()
                .any(|index| index.columns.first() == Some(&fk.column))
        })
        .map(|fk| {
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
                schema.name, fk.column, schema.name, fk.column
            )
        });

    declared.chain(foreign).collect()
}

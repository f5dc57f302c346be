//! SQLite persistence for the Pokédex graph.
//!
//! DDL is generated from the static table descriptors in [`crate::schema`];
//! rows are written through the generic [`Store::insert`] so every table is
//! bound in declared column order.

pub mod query;
pub mod record;
pub mod schema_gen;

use rusqlite::{Connection, ErrorCode, OptionalExtension};
use std::path::Path;

use crate::error::StoreError;
use crate::schema::{DependencyResolver, TableSchema};
use schema_gen::{generate_create_table, generate_indexes};

pub use record::{Record, SqlValue};

/// What to do when an insert hits a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnConflict {
    /// Surface the violation as [`StoreError::ConstraintViolation`]
    Fail,
    /// Keep the existing row untouched
    Ignore,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    StoreError::Schema(format!("cannot create {}: {}", parent.display(), err))
                })?;
            }
        }
        let conn = Connection::open(db_path).map_err(StoreError::sqlite("open database"))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::sqlite("open database"))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(StoreError::sqlite("configure pragmas"))?;

        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create all tables and indexes in dependency order
    pub fn create_tables(&self) -> Result<(), StoreError> {
        let tables = DependencyResolver::new()
            .creation_order()
            .map_err(StoreError::Schema)?;

        for schema in tables {
            self.conn
                .execute(&generate_create_table(schema), [])
                .map_err(StoreError::sqlite("create table"))?;

            for index_sql in generate_indexes(schema) {
                self.conn
                    .execute(&index_sql, [])
                    .map_err(StoreError::sqlite("create index"))?;
            }
        }

        Ok(())
    }

    /// Delete every row, children before parents
    pub fn clear(&self) -> Result<(), StoreError> {
        let tables = DependencyResolver::new()
            .clear_order()
            .map_err(StoreError::Schema)?;

        self.unit(|store| {
            for schema in tables {
                store
                    .conn
                    .execute(&format!("DELETE FROM {}", schema.name), [])
                    .map_err(StoreError::sqlite("clear table"))?;
            }
            Ok(())
        })
    }

    /// Run `work` inside one transaction; any error rolls the whole unit back
    pub fn unit<R, E>(&self, work: impl FnOnce(&Self) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(StoreError::sqlite("begin transaction"))?;
        let out = work(self)?;
        tx.commit().map_err(StoreError::sqlite("commit transaction"))?;
        Ok(out)
    }

    /// Insert a record, binding columns in schema order.
    ///
    /// Columns missing from the record are bound as NULL, which lets SQLite
    /// assign the rowid for surrogate `id` columns. Returns the row id.
    pub fn insert(
        &self,
        schema: &'static TableSchema,
        record: &Record,
        on_conflict: OnConflict,
    ) -> Result<i64, StoreError> {
        let columns = schema.column_names();
        let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
        let verb = match on_conflict {
            OnConflict::Fail => "INSERT",
            OnConflict::Ignore => "INSERT OR IGNORE",
        };
        let sql = format!(
            "{} INTO {} ({}) VALUES ({})",
            verb,
            schema.name,
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut stmt = self
            .conn
            .prepare_cached(&sql)
            .map_err(StoreError::sqlite("prepare insert"))?;

        for (idx, col_name) in columns.iter().enumerate() {
            let value = record.get(col_name).cloned().unwrap_or(SqlValue::Null);
            value
                .bind_to(idx + 1, &mut stmt)
                .map_err(StoreError::sqlite("bind insert parameter"))?;
        }

        let changed = stmt.raw_execute().map_err(|source| classify(schema, source))?;
        if changed == 0 {
            return Ok(0);
        }
        Ok(self.conn.last_insert_rowid())
    }

    /// Look up a reference row id by its natural key
    pub fn find_id_by_key(
        &self,
        schema: &'static TableSchema,
        key: &str,
    ) -> Result<Option<i64>, StoreError> {
        let column = schema.natural_key.ok_or_else(|| {
            StoreError::Schema(format!("{} has no natural key", schema.name))
        })?;
        let sql = format!("SELECT id FROM {} WHERE {} = ?1", schema.name, column);
        self.conn
            .prepare_cached(&sql)
            .and_then(|mut stmt| stmt.query_row([key], |row| row.get(0)).optional())
            .map_err(StoreError::sqlite("lookup natural key"))
    }

    pub fn exists(&self, schema: &'static TableSchema, id: i64) -> Result<bool, StoreError> {
        let sql = format!("SELECT 1 FROM {} WHERE id = ?1 LIMIT 1", schema.name);
        self.conn
            .prepare_cached(&sql)
            .and_then(|mut stmt| stmt.exists([id]))
            .map_err(StoreError::sqlite("check existence"))
    }

    pub fn count(&self, schema: &'static TableSchema) -> Result<i64, StoreError> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", schema.name), [], |row| {
                row.get(0)
            })
            .map_err(StoreError::sqlite("count rows"))
    }

    /// Overwrite selected columns of one row, leaving the rest untouched
    pub fn update_columns(
        &self,
        schema: &'static TableSchema,
        id: i64,
        record: &Record,
    ) -> Result<usize, StoreError> {
        let mut columns: Vec<&'static str> = record.values.keys().copied().collect();
        if columns.is_empty() {
            return Ok(0);
        }
        columns.sort_unstable();

        for column in &columns {
            if schema.column(column).is_none() || *column == "id" {
                return Err(StoreError::Schema(format!(
                    "{} is not an updatable column of {}",
                    column, schema.name
                )));
            }
        }

        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| format!("{} = ?{}", column, idx + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            schema.name,
            assignments.join(", "),
            columns.len() + 1
        );

        let mut params: Vec<&dyn rusqlite::ToSql> = columns
            .iter()
            .map(|column| &record.values[column] as &dyn rusqlite::ToSql)
            .collect();
        params.push(&id);

        self.conn
            .execute(&sql, params.as_slice())
            .map_err(StoreError::sqlite("update columns"))
    }
}

fn classify(schema: &'static TableSchema, source: rusqlite::Error) -> StoreError {
    match source.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => StoreError::ConstraintViolation {
            table: schema.name,
            source,
        },
        _ => StoreError::Sqlite {
            operation: "insert row",
            source,
        },
    }
}

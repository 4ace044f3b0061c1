//! Execution facade over the connection manager
//!
//! Exposes the two-method contract the entity manager consumes: `execute`
//! for statements and `query_all` for row-returning queries, both with
//! positionally bound scalar parameters.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlite_conn_mgr::{SqliteDatabase, SqliteDatabaseConfig};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as SqlxRow, TypeInfo};

use crate::error::{Error, Result};

/// A result row: column name to decoded value, in result-set column order.
pub type Row = IndexMap<String, JsonValue>;

/// Thin execution facade over [`SqliteDatabase`].
///
/// Cloning is cheap; all clones share the same underlying pools.
#[derive(Clone)]
pub struct Connection {
   inner: Arc<SqliteDatabase>,
}

impl Connection {
   /// Open (creating when missing) the datastore file at `path`.
   pub async fn open(
      path: impl AsRef<Path>,
      config: Option<SqliteDatabaseConfig>,
   ) -> Result<Self> {
      let inner = SqliteDatabase::connect(path, config).await?;
      Ok(Self { inner })
   }

   /// Execute a write statement (DDL, INSERT, UPDATE, or DELETE).
   pub async fn execute(&self, sql: &str, params: &[JsonValue]) -> Result<()> {
      let mut writer = self.inner.acquire_writer().await?;

      let mut q = sqlx::query(sql);
      for value in params {
         q = bind_value(q, value.clone());
      }

      q.execute(&mut *writer).await?;
      Ok(())
   }

   /// Run a SELECT on the read pool and decode every row.
   pub async fn query_all(&self, sql: &str, params: &[JsonValue]) -> Result<Vec<Row>> {
      let pool = self.inner.read_pool()?;

      let mut q = sqlx::query(sql);
      for value in params {
         q = bind_value(q, value.clone());
      }

      let rows = q.fetch_all(pool).await?;
      decode_rows(rows)
   }

   /// Close the underlying database.
   pub async fn close(&self) -> Result<()> {
      self.inner.close().await?;
      Ok(())
   }
}

/// Helper function to bind a scalar JSON value to a SQLx query
fn bind_value<'a>(
   query: sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>>,
   value: JsonValue,
) -> sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>> {
   match value {
      JsonValue::Null => query.bind(None::<String>),
      JsonValue::String(text) => query.bind(text),
      JsonValue::Bool(flag) => query.bind(flag),
      JsonValue::Number(number) => {
         // Preserve integer precision by binding as i64 when possible
         if let Some(int_val) = number.as_i64() {
            query.bind(int_val)
         } else if let Some(uint_val) = number.as_u64() {
            // Too large for i64; f64 loses precision but still binds
            query.bind(uint_val as f64)
         } else {
            query.bind(number.as_f64().unwrap_or_default())
         }
      }
      // Compound values never pass schema inference; bind their JSON text
      // so a raw statement with such a parameter still executes
      other => query.bind(other.to_string()),
   }
}

/// Decode SQLite rows to column-name-keyed scalar values.
fn decode_rows(rows: Vec<SqliteRow>) -> Result<Vec<Row>> {
   let mut decoded = Vec::with_capacity(rows.len());
   for row in &rows {
      let mut record = Row::default();
      for (i, column) in row.columns().iter().enumerate() {
         let value = decode_column(row, i, column.type_info().name())?;
         record.insert(column.name().to_string(), value);
      }
      decoded.push(record);
   }
   Ok(decoded)
}

/// Decode one column by its declared SQLite type.
fn decode_column(row: &SqliteRow, index: usize, type_name: &str) -> Result<JsonValue> {
   let value = match type_name {
      "TEXT" => row
         .try_get::<Option<String>, _>(index)?
         .map(JsonValue::String)
         .unwrap_or(JsonValue::Null),
      "INTEGER" => row
         .try_get::<Option<i64>, _>(index)?
         .map(JsonValue::from)
         .unwrap_or(JsonValue::Null),
      "BOOLEAN" => row
         .try_get::<Option<bool>, _>(index)?
         .map(JsonValue::Bool)
         .unwrap_or(JsonValue::Null),
      "REAL" => row
         .try_get::<Option<f64>, _>(index)?
         .and_then(serde_json::Number::from_f64)
         .map(JsonValue::Number)
         .unwrap_or(JsonValue::Null),
      "NULL" => JsonValue::Null,
      other => return Err(Error::UnsupportedDatatype(other.to_string())),
   };
   Ok(value)
}

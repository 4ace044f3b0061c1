//! Per-table entity manager: schema inference and CRUD statement generation

use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::connection::{Connection, Row};
use crate::error::{Error, Result};
use crate::filter::Filter;

/// An entity: an ordered mapping from field name to scalar value.
///
/// Supported values are strings, numbers, and booleans. The field named
/// `id` is the identity field and is renamed to `<table>id` wherever
/// column keys are generated.
pub type Entity = IndexMap<String, JsonValue>;

/// Conventional name of the identity field on entities.
const IDENTITY_FIELD: &str = "id";

/// Ordered column views derived from one entity or filter.
///
/// All three lists follow the source map's own field order, and `keys` and
/// `values` correspond 1:1.
struct ColumnParts {
   /// Column names with the identity field renamed to `<table>id`
   keys: Vec<String>,
   /// Values in the same order as `keys`
   values: Vec<JsonValue>,
   /// Comma-joined original field names, used as the insert column list
   columns: String,
   /// Comma-joined positional placeholders, one per value
   placeholders: String,
}

/// Translates entity-shaped data and filters into SQL statements for one
/// table, and executes them through the connection.
///
/// Managers are handed out by [`crate::EntityStore`], one per table name.
/// The table's schema is created lazily by the first successful
/// [`save`](Self::save); that first entity's shape fixes the schema for the
/// process lifetime.
pub struct EntityManager {
   table: String,
   conn: Connection,
   /// Set once this manager's CREATE TABLE statement has succeeded
   schema_created: AtomicBool,
}

impl EntityManager {
   pub(crate) fn new(table: impl Into<String>, conn: Connection) -> Self {
      Self {
         table: table.into(),
         conn,
         schema_created: AtomicBool::new(false),
      }
   }

   /// Name of the table this manager is bound to.
   pub fn table(&self) -> &str {
      &self.table
   }

   /// Create the table from `entity`'s shape unless it was already created
   /// by this manager.
   ///
   /// Column types are inferred from the entity's values (string → TEXT,
   /// number → INTEGER, boolean → BOOLEAN). A field holding any other value
   /// fails with [`Error::UnsupportedType`] before any DDL is issued. On a
   /// failed statement the created flag stays unset, so a later call
   /// retries.
   ///
   /// Two racing first saves may both reach the CREATE TABLE statement; the
   /// `IF NOT EXISTS` clause keeps that harmless.
   pub async fn create_table_if_not_exists(&self, entity: &Entity) -> Result<()> {
      if self.schema_created.load(Ordering::Acquire) {
         return Ok(());
      }

      let sql = create_table_sql(&self.table, entity)?;
      debug!(table = %self.table, sql = %sql, "Creating table");
      self.conn.execute(&sql, &[]).await?;

      self.schema_created.store(true, Ordering::Release);
      Ok(())
   }

   /// Insert `entity` as one row, creating the table first when needed.
   ///
   /// The insert column list uses the entity's original field names,
   /// including a literal `id` column for the identity field; only the
   /// generated key column carries the `<table>id` name.
   pub async fn save(&self, entity: &Entity) -> Result<()> {
      self.create_table_if_not_exists(entity).await?;

      let parts = column_parts(&self.table, entity);
      let sql = format!(
         "INSERT INTO {} ({}) VALUES ({})",
         self.table, parts.columns, parts.placeholders
      );
      debug!(table = %self.table, sql = %sql, "Saving entity");
      self.conn.execute(&sql, &parts.values).await
   }

   /// Return rows matching every constraint in `filter`.
   ///
   /// The full result set is fetched first; `limit` trims it client-side to
   /// the first N rows in retrieval order.
   pub async fn find(&self, filter: &Filter, limit: Option<usize>) -> Result<Vec<Row>> {
      let parts = column_parts(&self.table, filter.fields());
      let sql = format!(
         "SELECT * FROM {}{}",
         self.table,
         where_clause(&parts.keys)
      );
      debug!(table = %self.table, sql = %sql, "Finding entities");

      let mut rows = self.conn.query_all(&sql, &parts.values).await?;
      if let Some(limit) = limit {
         rows.truncate(limit);
      }
      Ok(rows)
   }

   /// Return every row of the table.
   pub async fn find_all(&self) -> Result<Vec<Row>> {
      let sql = format!("SELECT * FROM {}", self.table);
      debug!(table = %self.table, sql = %sql, "Fetching all entities");
      self.conn.query_all(&sql, &[]).await
   }

   /// Delete rows matching every constraint in `filter`.
   ///
   /// Matching zero rows is not an error; no affected-row count is
   /// surfaced.
   pub async fn delete(&self, filter: &Filter) -> Result<()> {
      let parts = column_parts(&self.table, filter.fields());
      let sql = format!(
         "DELETE FROM {}{}",
         self.table,
         where_clause(&parts.keys)
      );
      debug!(table = %self.table, sql = %sql, "Deleting entities");
      self.conn.execute(&sql, &parts.values).await
   }

   /// Set `updates`' fields on every row matching `matches`.
   ///
   /// An empty update map is a silent no-op: no statement is issued. Update
   /// values are bound before match values.
   pub async fn update(&self, matches: &Filter, updates: &Entity) -> Result<()> {
      let update_parts = column_parts(&self.table, updates);
      if update_parts.keys.is_empty() {
         return Ok(());
      }

      let match_parts = column_parts(&self.table, matches.fields());
      let assignments = update_parts
         .keys
         .iter()
         .map(|key| format!("{} = ?", key))
         .collect::<Vec<_>>()
         .join(", ");
      let sql = format!(
         "UPDATE {} SET {}{}",
         self.table,
         assignments,
         where_clause(&match_parts.keys)
      );
      debug!(table = %self.table, sql = %sql, "Updating entities");

      let mut params = update_parts.values;
      params.extend(match_parts.values);
      self.conn.execute(&sql, &params).await
   }
}

/// Derive the ordered column views for `fields` against `table`.
fn column_parts(table: &str, fields: &IndexMap<String, JsonValue>) -> ColumnParts {
   let keys = fields
      .keys()
      .map(|key| {
         if key == IDENTITY_FIELD {
            format!("{}{}", table, IDENTITY_FIELD)
         } else {
            key.clone()
         }
      })
      .collect();
   let values: Vec<JsonValue> = fields.values().cloned().collect();
   let columns = fields.keys().cloned().collect::<Vec<_>>().join(", ");
   let placeholders = vec!["?"; values.len()].join(", ");

   ColumnParts {
      keys,
      values,
      columns,
      placeholders,
   }
}

/// Compose the CREATE TABLE statement for `entity`'s shape.
///
/// The generated key column `<table>id` comes first; every entity field
/// follows under its original name with its inferred type.
fn create_table_sql(table: &str, entity: &Entity) -> Result<String> {
   let mut attributes = vec![format!(
      "{}{} INTEGER PRIMARY KEY AUTOINCREMENT",
      table, IDENTITY_FIELD
   )];
   for (field, value) in entity {
      attributes.push(format!("{} {}", field, sql_type(field, value)?));
   }
   Ok(format!(
      "CREATE TABLE IF NOT EXISTS {} ({})",
      table,
      attributes.join(", ")
   ))
}

/// Map a scalar value tag to its SQLite column type.
fn sql_type(field: &str, value: &JsonValue) -> Result<&'static str> {
   match value {
      JsonValue::String(_) => Ok("TEXT"),
      JsonValue::Number(_) => Ok("INTEGER"),
      JsonValue::Bool(_) => Ok("BOOLEAN"),
      other => Err(Error::UnsupportedType {
         field: field.to_string(),
         datatype: json_type_name(other).to_string(),
      }),
   }
}

fn json_type_name(value: &JsonValue) -> &'static str {
   match value {
      JsonValue::Null => "null",
      JsonValue::Bool(_) => "boolean",
      JsonValue::Number(_) => "number",
      JsonValue::String(_) => "string",
      JsonValue::Array(_) => "array",
      JsonValue::Object(_) => "object",
   }
}

/// ` WHERE k1 = ? AND k2 = ? …`, or empty when there are no keys.
fn where_clause(keys: &[String]) -> String {
   if keys.is_empty() {
      return String::new();
   }
   let predicates = keys
      .iter()
      .map(|key| format!("{} = ?", key))
      .collect::<Vec<_>>()
      .join(" AND ");
   format!(" WHERE {}", predicates)
}

//! # sqlite-entity-store
//!
//! A minimal schema-on-first-write entity mapping layer for SQLite.
//!
//! Entities are flat, ordered maps from field name to scalar JSON value.
//! The first entity saved to a table determines that table's schema for the
//! process lifetime; no upfront schema declaration and no migrations.
//!
//! ## Core Types
//!
//! - **[`EntityStore`]**: Handle to one datastore file, owning the per-table manager registry
//! - **[`EntityManager`]**: Per-table schema inference and CRUD statement generation
//! - **[`Filter`]**: Non-empty set of `field = value` constraints combined with AND
//! - **[`Connection`]**: Execution facade (`execute` / `query_all`) over the connection manager
//!
//! ## Example
//!
//! ```no_run
//! use serde_json::json;
//! use sqlite_entity_store::{EntityStore, Entity, Filter};
//!
//! # async fn run() -> sqlite_entity_store::Result<()> {
//! let store = EntityStore::open("./db/db.sqlite3", None).await?;
//! let people = store.manager("people").await;
//!
//! let mut ann = Entity::new();
//! ann.insert("name".into(), json!("Ann"));
//! ann.insert("active".into(), json!(true));
//! people.save(&ann).await?;
//!
//! let rows = people.find(&Filter::new("name", "Ann"), None).await?;
//! # Ok(())
//! # }
//! ```

mod connection;
mod error;
mod filter;
mod manager;
mod store;

pub use connection::{Connection, Row};
pub use sqlite_conn_mgr::SqliteDatabaseConfig;
pub use error::{Error, Result};
pub use filter::Filter;
pub use manager::{Entity, EntityManager};
pub use store::EntityStore;

//! Top-level store handle owning the per-table manager registry

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use sqlite_conn_mgr::SqliteDatabaseConfig;
use tokio::sync::RwLock;
use tracing::debug;

use crate::connection::Connection;
use crate::error::Result;
use crate::manager::EntityManager;

/// Handle to one datastore file plus the registry of per-table managers.
///
/// The registry hands out at most one [`EntityManager`] per table name for
/// the lifetime of this store, so each table has a single schema-created
/// flag and a single statement-generation path. Insertion is performed
/// under a write lock, so concurrent first requests for the same table
/// still yield one manager.
pub struct EntityStore {
   conn: Connection,
   managers: RwLock<HashMap<String, Arc<EntityManager>>>,
}

impl EntityStore {
   /// Open the datastore file at `path`, creating it (and its parent
   /// directory) when missing.
   pub async fn open(
      path: impl AsRef<Path>,
      config: Option<SqliteDatabaseConfig>,
   ) -> Result<Self> {
      let conn = Connection::open(path, config).await?;
      Ok(Self {
         conn,
         managers: RwLock::new(HashMap::new()),
      })
   }

   /// The manager for `table`, created on first request and cached for the
   /// lifetime of this store. Never fails.
   pub async fn manager(&self, table: &str) -> Arc<EntityManager> {
      {
         let managers = self.managers.read().await;
         if let Some(manager) = managers.get(table) {
            return manager.clone();
         }
      }

      let mut managers = self.managers.write().await;
      managers
         .entry(table.to_string())
         .or_insert_with(|| {
            debug!(table = %table, "Creating entity manager");
            Arc::new(EntityManager::new(table, self.conn.clone()))
         })
         .clone()
   }

   /// Raw access to the underlying connection, for statements outside the
   /// entity mapping (schema introspection, fixtures).
   pub fn connection(&self) -> &Connection {
      &self.conn
   }

   /// Close the underlying database.
   pub async fn close(self) -> Result<()> {
      self.conn.close().await
   }
}

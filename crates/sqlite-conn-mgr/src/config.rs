//! Configuration for SQLite database connections

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for SqliteDatabase connection pools and file creation
///
/// # Examples
///
/// ```
/// use sqlite_conn_mgr::SqliteDatabaseConfig;
/// use std::time::Duration;
///
/// // Use defaults
/// let config = SqliteDatabaseConfig::default();
///
/// // Override just one field
/// let config = SqliteDatabaseConfig {
///     max_read_connections: 3,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteDatabaseConfig {
   /// Maximum number of concurrent read connections
   ///
   /// This controls the size of the read-only connection pool.
   /// Higher values allow more concurrent read queries but consume more resources.
   ///
   /// Default: 6
   pub max_read_connections: u32,

   /// Idle timeout for both read and write connections
   ///
   /// Connections that remain idle for this duration will be closed automatically.
   ///
   /// Default: 30 seconds
   pub idle_timeout: Duration,

   /// Create the datastore file when it does not exist yet
   ///
   /// When false, connecting to a missing file fails instead of creating it.
   ///
   /// Default: true
   pub create_if_missing: bool,
}

impl Default for SqliteDatabaseConfig {
   fn default() -> Self {
      Self {
         max_read_connections: 6,
         idle_timeout: Duration::from_secs(30),
         create_if_missing: true,
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn default_config_values() {
      let config = SqliteDatabaseConfig::default();
      assert_eq!(config.max_read_connections, 6);
      assert_eq!(config.idle_timeout, Duration::from_secs(30));
      assert!(config.create_if_missing);
   }
}

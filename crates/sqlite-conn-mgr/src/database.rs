//! SQLite database with connection pooling and serialized write access

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::config::SqliteDatabaseConfig;
use crate::error::{Error, Result};
use crate::write_guard::WriteGuard;

/// SQLite database with connection pooling for concurrent reads and serialized writes.
///
/// ## Architecture
///
/// The database maintains two connection pools:
/// - **`read_pool`**: Pool of read-only connections for concurrent reads
/// - **`write_conn`**: Single-connection pool for exclusive write access (enforced by max_connections=1)
///
/// ## State Management
///
/// - **`wal_initialized`**: Tracks whether WAL journal mode has been enabled (lazy initialization)
/// - **`closed`**: Prevents use after the database has been closed
/// - **`path`**: Database file path, exposed for diagnostics
///
/// ## Usage Pattern
///
/// ```text
/// 1. Connect to database (creates the file and parent directory when missing)
/// 2. Read operations: Access read_pool for concurrent reads
/// 3. Write operations: Acquire writer (lazily enables WAL on first call)
/// 4. Close database when done
/// ```
#[derive(Debug)]
pub struct SqliteDatabase {
   /// Pool of read-only connections (defaults to max_connections=6) for concurrent reads
   read_pool: Pool<Sqlite>,

   /// Single read-write connection pool (max_connections=1) for serialized writes
   write_conn: Pool<Sqlite>,

   /// Tracks if WAL mode has been initialized (set on first write)
   wal_initialized: AtomicBool,

   /// Marks database as closed to prevent further operations
   closed: AtomicBool,

   /// Path to database file
   path: PathBuf,
}

impl SqliteDatabase {
   /// Connect to the database file at `path`, creating it (and its parent
   /// directory) when missing and `create_if_missing` is enabled.
   pub async fn connect(
      path: impl AsRef<Path>,
      config: Option<SqliteDatabaseConfig>,
   ) -> Result<Arc<Self>> {
      let config = config.unwrap_or_default();
      let path = path.as_ref().to_path_buf();

      if config.create_if_missing
         && let Some(parent) = path.parent()
         && !parent.as_os_str().is_empty()
      {
         // An already-existing directory is not an error here
         std::fs::create_dir_all(parent)?;
      }

      let write_options = SqliteConnectOptions::new()
         .filename(&path)
         .create_if_missing(config.create_if_missing);

      // The writer pool connects first so a missing file exists by the time
      // the read-only pool opens it.
      let write_conn = SqlitePoolOptions::new()
         .max_connections(1)
         .idle_timeout(config.idle_timeout)
         .connect_with(write_options.clone())
         .await?;

      let read_options = write_options.create_if_missing(false).read_only(true);
      let read_pool = SqlitePoolOptions::new()
         .max_connections(config.max_read_connections)
         .idle_timeout(config.idle_timeout)
         .connect_with(read_options)
         .await?;

      debug!(path = %path.display(), "Connected to SQLite database");

      Ok(Arc::new(Self {
         read_pool,
         write_conn,
         wal_initialized: AtomicBool::new(false),
         closed: AtomicBool::new(false),
         path,
      }))
   }

   /// Access the read-only connection pool for queries.
   pub fn read_pool(&self) -> Result<&Pool<Sqlite>> {
      if self.closed.load(Ordering::Acquire) {
         return Err(Error::DatabaseClosed);
      }
      Ok(&self.read_pool)
   }

   /// Acquire exclusive write access.
   ///
   /// The first successful acquisition enables WAL journal mode on the
   /// database; subsequent calls skip the pragma.
   pub async fn acquire_writer(&self) -> Result<WriteGuard> {
      if self.closed.load(Ordering::Acquire) {
         return Err(Error::DatabaseClosed);
      }

      let mut conn = self.write_conn.acquire().await?;

      if !self.wal_initialized.load(Ordering::Acquire) {
         sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&mut *conn)
            .await?;
         self.wal_initialized.store(true, Ordering::Release);
         debug!(path = %self.path.display(), "WAL journal mode enabled");
      }

      Ok(WriteGuard::new(conn))
   }

   /// Path of the backing database file.
   pub fn path(&self) -> &Path {
      &self.path
   }

   /// Close both pools. Further operations return [`Error::DatabaseClosed`].
   pub async fn close(&self) -> Result<()> {
      if self.closed.swap(true, Ordering::AcqRel) {
         return Ok(());
      }
      self.read_pool.close().await;
      self.write_conn.close().await;
      Ok(())
   }
}

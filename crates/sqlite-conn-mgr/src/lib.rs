//! # sqlite-conn-mgr
//!
//! A minimal wrapper around SQLx that enforces pragmatic SQLite connection
//! policies for embedded, file-backed datastores.
//!
//! ## Core Types
//!
//! - **[`SqliteDatabase`]**: Main database type with separate read and write connection pools
//! - **[`SqliteDatabaseConfig`]**: Configuration for file creation and pool settings
//! - **[`WriteGuard`]**: RAII guard ensuring exclusive write access
//! - **[`Error`]**: Error type for database operations
//!
//! ## Architecture
//!
//! - **Dual pools**: Separate read-only pool and write pool (max 1 connection)
//! - **Lazy WAL mode**: Write-Ahead Logging enabled automatically on first write
//! - **Exclusive writes**: Single-connection write pool enforces serialized write access
//! - **File lifecycle**: The datastore file and its parent directory are created on
//!   first connect when missing; an already-existing directory is not an error

mod config;
mod database;
mod error;
mod write_guard;

// Re-export public types
pub use config::SqliteDatabaseConfig;
pub use database::SqliteDatabase;
pub use error::{Error, Result};
pub use write_guard::WriteGuard;

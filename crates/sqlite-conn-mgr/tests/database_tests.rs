//! Integration tests for the connection manager.
//!
//! Each test connects to a real on-disk database under a temp directory.

use sqlite_conn_mgr::{Error, SqliteDatabase, SqliteDatabaseConfig};
use sqlx::Row;
use tempfile::TempDir;

#[tokio::test]
async fn connect_creates_file_and_parent_directory() {
   let temp = TempDir::new().unwrap();
   let path = temp.path().join("nested").join("db.sqlite3");

   let db = SqliteDatabase::connect(&path, None).await.unwrap();

   assert!(path.exists());
   assert_eq!(db.path(), path);
   db.close().await.unwrap();
}

#[tokio::test]
async fn reconnecting_to_existing_directory_is_not_an_error() {
   let temp = TempDir::new().unwrap();
   let path = temp.path().join("db.sqlite3");

   let first = SqliteDatabase::connect(&path, None).await.unwrap();
   first.close().await.unwrap();

   // Directory and file both exist now; a second connect must still succeed
   let second = SqliteDatabase::connect(&path, None).await.unwrap();
   second.close().await.unwrap();
}

#[tokio::test]
async fn missing_file_fails_when_creation_is_disabled() {
   let temp = TempDir::new().unwrap();
   let path = temp.path().join("absent.sqlite3");
   let config = SqliteDatabaseConfig {
      create_if_missing: false,
      ..Default::default()
   };

   let result = SqliteDatabase::connect(&path, Some(config)).await;

   assert!(result.is_err());
   assert!(!path.exists());
}

#[tokio::test]
async fn write_through_writer_is_visible_to_read_pool() {
   let temp = TempDir::new().unwrap();
   let db = SqliteDatabase::connect(temp.path().join("db.sqlite3"), None)
      .await
      .unwrap();

   let mut writer = db.acquire_writer().await.unwrap();
   sqlx::query("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)")
      .execute(&mut *writer)
      .await
      .unwrap();
   sqlx::query("INSERT INTO notes (body) VALUES (?)")
      .bind("hello")
      .execute(&mut *writer)
      .await
      .unwrap();
   drop(writer);

   let rows = sqlx::query("SELECT body FROM notes")
      .fetch_all(db.read_pool().unwrap())
      .await
      .unwrap();

   assert_eq!(rows.len(), 1);
   assert_eq!(rows[0].get::<String, _>("body"), "hello");
   db.close().await.unwrap();
}

#[tokio::test]
async fn closed_database_rejects_further_operations() {
   let temp = TempDir::new().unwrap();
   let db = SqliteDatabase::connect(temp.path().join("db.sqlite3"), None)
      .await
      .unwrap();

   db.close().await.unwrap();

   assert!(matches!(db.read_pool(), Err(Error::DatabaseClosed)));
   assert!(matches!(
      db.acquire_writer().await,
      Err(Error::DatabaseClosed)
   ));

   // Closing twice is a no-op
   db.close().await.unwrap();
}

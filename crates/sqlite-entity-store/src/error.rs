//! Error types for entity-store operations

/// Result type alias for entity-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for entity-store operations.
///
/// Statement-execution failures propagate unchanged from sqlx or the
/// connection manager; no operation is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from SQLx operations.
   #[error(transparent)]
   Sqlx(#[from] sqlx::Error),

   /// Error from the connection manager.
   #[error(transparent)]
   ConnectionManager(#[from] sqlite_conn_mgr::Error),

   /// Entity field whose value has no SQLite column type. Raised during
   /// schema inference, before any DDL is issued.
   #[error("unsupported type in entity field '{field}': {datatype}")]
   UnsupportedType { field: String, datatype: String },

   /// SQLite column type that cannot be decoded to a scalar value.
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
         Error::ConnectionManager(_) => "CONNECTION_ERROR".to_string(),
         Error::UnsupportedType { .. } => "UNSUPPORTED_TYPE".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
      }
   }
}

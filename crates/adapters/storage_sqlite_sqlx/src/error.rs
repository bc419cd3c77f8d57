//! Storage-specific error type wrapping sqlx errors.

use zonefare_domain::error::ZonefareError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// A JSON column could not be encoded or decoded.
    #[error("JSON column error")]
    Json(#[from] serde_json::Error),

    /// A stored timestamp is not RFC 3339.
    #[error("invalid stored timestamp")]
    Timestamp(#[from] zonefare_domain::time::ParseError),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for ZonefareError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

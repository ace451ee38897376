// Error handling framework

use thiserror::Error;

/// Database-specific errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timed out waiting for a database connection")]
    ConnectionTimeout,

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate key violation: {0}")]
    DuplicateKey(String),

    #[error("Column serialization failed: {0}")]
    Serialization(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl DatabaseError {
    /// True when the error means "no row matched the given id"
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }
}

/// Errors raised while fetching records from the external placeholder API
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request to {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Response from {url} could not be decoded: {reason}")]
    Decode { url: String, reason: String },
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),
}

/// Bulk import / delete errors
#[derive(Error, Debug)]
pub enum BulkError {
    #[error("Fetching source data failed: {0}")]
    Source(#[from] SourceError),

    #[error("Replacing table contents failed: {0}")]
    Database(#[from] DatabaseError),
}

// MySQL server error number for duplicate entries
const ER_DUP_ENTRY: &str = "1062";

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::ConnectionTimeout,
            sqlx::Error::PoolClosed => {
                DatabaseError::ConnectionFailed("Connection pool is closed".to_string())
            }
            sqlx::Error::Io(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::Tls(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) if code.as_ref() == ER_DUP_ENTRY => {
                    DatabaseError::DuplicateKey(db_err.message().to_string())
                }
                _ => DatabaseError::QueryFailed(db_err.message().to_string()),
            },
            sqlx::Error::Migrate(e) => DatabaseError::MigrationFailed(e.to_string()),
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::InvalidJson(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_maps_to_connection_timeout() {
        let err: DatabaseError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DatabaseError::ConnectionTimeout));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DatabaseError = sqlx::Error::RowNotFound.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_fields_display_lists_every_field() {
        let err = ValidationError::MissingFields(vec!["title".to_string(), "body".to_string()]);
        assert_eq!(err.to_string(), "Missing required fields: title, body");
    }

    #[test]
    fn test_bulk_error_wraps_source_error() {
        let err: BulkError = SourceError::Status {
            url: "http://example.test/users".to_string(),
            status: 503,
        }
        .into();
        assert!(err.to_string().contains("503"));
    }
}

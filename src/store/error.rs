use thiserror::Error;
use tokio_postgres::error::SqlState;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error types for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {}", constraint.as_deref().unwrap_or("unknown"))]
    UniqueViolation { constraint: Option<String> },

    /// A referenced row is gone, e.g. a message for a deleted chat
    #[error("Foreign key violated: {}", constraint.as_deref().unwrap_or("unknown"))]
    ForeignKeyViolation { constraint: Option<String> },

    /// Database unreachable or misconfigured
    #[error("Connection error: {0}")]
    Connection(String),

    /// Connection pool exhausted or closed
    #[error("Pool error: {0}")]
    Pool(String),

    /// SQL errors and anything else reported by PostgreSQL
    #[error("Database error: {0}")]
    Database(String),

    /// A stored row could not be mapped back into a domain type
    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

impl StoreError {
    /// True for unique constraint violations
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { .. })
    }

    /// True when a referenced row no longer exists
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, StoreError::ForeignKeyViolation { .. })
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_error) = err.as_db_error() {
            if db_error.code() == &SqlState::UNIQUE_VIOLATION {
                return StoreError::UniqueViolation {
                    constraint: db_error.constraint().map(str::to_string),
                };
            }
            if db_error.code() == &SqlState::FOREIGN_KEY_VIOLATION {
                return StoreError::ForeignKeyViolation {
                    constraint: db_error.constraint().map(str::to_string),
                };
            }
            return StoreError::Database(format!(
                "{}: {}",
                db_error.code().code(),
                db_error.message()
            ));
        }

        StoreError::Database(err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StoreError::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_display() {
        let err = StoreError::UniqueViolation {
            constraint: Some("users_email_key".to_string()),
        };
        assert!(err.is_unique_violation());
        assert!(err.to_string().contains("users_email_key"));

        let err = StoreError::UniqueViolation { constraint: None };
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_other_errors_are_not_unique_violations() {
        assert!(!StoreError::Database("boom".to_string()).is_unique_violation());
        assert!(!StoreError::Pool("closed".to_string()).is_unique_violation());
    }

    #[test]
    fn test_foreign_key_violation() {
        let err = StoreError::ForeignKeyViolation {
            constraint: Some("messages_chat_id_fkey".to_string()),
        };
        assert!(err.is_foreign_key_violation());
        assert!(!err.is_unique_violation());
        assert!(err.to_string().contains("messages_chat_id_fkey"));
        assert!(!StoreError::Database("boom".to_string()).is_foreign_key_violation());
    }
}

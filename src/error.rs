//! Error types shared by the store, auth and HTTP layers.

use thiserror::Error;

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors that can occur anywhere in the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input failed validation before it reached the database.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The row does not exist or belongs to another user.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Missing, malformed, expired or revoked credentials.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Bad configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(db.message().to_string())
            }
            value => {
                tracing::error!("an unhandled SQL error occurred: {}", value);
                AppError::Database(value)
            }
        }
    }
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Returns true if the caller is at fault (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::NotFound(_)
                | AppError::Unauthorized(_)
                | AppError::Conflict(_)
        )
    }

    /// Returns true if the server is at fault (5xx).
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(AppError::validation("amount").is_client_error());
        assert!(AppError::NotFound("transaction").is_client_error());
        assert!(AppError::Internal("oops".into()).is_server_error());
        assert!(!AppError::Conflict("email".into()).is_server_error());
    }

    #[test]
    fn error_display() {
        assert_eq!(
            AppError::NotFound("savings goal").to_string(),
            "savings goal not found"
        );
        assert_eq!(
            AppError::validation("amount must not be negative").to_string(),
            "invalid input: amount must not be negative"
        );
    }

    #[test]
    fn row_not_found_is_a_server_side_database_error() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Database(_)));
        assert!(err.is_server_error());
    }
}

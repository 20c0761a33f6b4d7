use crate::config::ConfigError;
use crate::domain::ValidationError;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Constraint violation on {table}: {message}")]
    ConstraintViolation {
        table: &'static str,
        message: String,
    },
    #[error("Not found: {table} id {id}")]
    NotFound { table: &'static str, id: i64 },
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Classify a failed write against `table`.
    ///
    /// Integrity failures reported by the engine become `ConstraintViolation`;
    /// everything else stays a plain database error.
    pub(crate) fn from_write(table: &'static str, err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::UniqueViolation
                | ErrorKind::CheckViolation => {
                    return StoreError::ConstraintViolation {
                        table,
                        message: db_err.message().to_string(),
                    };
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StoreError::ConstraintViolation { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

use activities::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl From<RepositoryError> for StoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut) => {
                StoreError::Unavailable("timed out waiting for a database connection".to_string())
            }
            RepositoryError::DatabaseError(sqlx::Error::Io(e)) => {
                StoreError::Unavailable(e.to_string())
            }
            RepositoryError::DatabaseError(sqlx::Error::Database(e))
                if e.is_unique_violation() =>
            {
                StoreError::Conflict(e.message().to_string())
            }
            RepositoryError::DatabaseError(e) => StoreError::Backend(Box::new(e)),
            RepositoryError::Corrupt(message) => StoreError::Corrupt(message),
        }
    }
}

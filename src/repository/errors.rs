use thiserror::Error;

/// Failures surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Another caller panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl<T> From<std::sync::PoisonError<T>> for RepositoryError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        RepositoryError::LockPoisoned
    }
}

/// Convenient alias for repository results.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

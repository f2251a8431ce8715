/// Errors raised by any repository implementation.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A driver-level error from sqlx.
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// A unique constraint was violated (constraint name attached).
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(String),

    /// A stored row could not be mapped back into a model.
    #[error("Corrupt row: {0}")]
    Decode(String),
}

pub type DbResult<T> = Result<T, DbError>;

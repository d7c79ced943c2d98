use thiserror::Error;

/// Domain-specific errors for credential operations
///
/// `InvalidCredentials` deliberately covers both "unknown email" and "wrong
/// password" so callers cannot tell them apart.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Result type for user operations that may fail with UserError
pub type UserResult<T> = Result<T, UserError>;

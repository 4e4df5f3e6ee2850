use service_core::error::AppError;
use thiserror::Error;

/// Outcome kinds of a user operation other than success.
#[derive(Error, Debug)]
pub enum UserServiceError {
    #[error("Invalid user ID: {0}")]
    InvalidId(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("User not found")]
    NotFound,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(anyhow::Error),
}

impl From<mongodb::error::Error> for UserServiceError {
    fn from(err: mongodb::error::Error) -> Self {
        UserServiceError::StoreUnavailable(anyhow::Error::new(err))
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidId(_) => AppError::BadRequest(anyhow::anyhow!("Invalid user ID")),
            UserServiceError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            UserServiceError::NotFound => AppError::NotFound(anyhow::anyhow!("User not found")),
            UserServiceError::StoreUnavailable(e) => AppError::DatabaseError(e),
        }
    }
}

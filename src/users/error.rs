use thiserror::Error;

use crate::users::password::HashError;
use crate::users::repo::StoreError;

/// Input rejected before any store call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid user ID format")]
    InvalidIdentifier,
    #[error("No fields provided for update")]
    NoFieldsProvided,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Username must not be empty")]
    EmptyUsername,
    #[error("Password too short")]
    PasswordTooShort,
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("User not found")]
    NotFound,
    #[error(transparent)]
    Hashing(#[from] HashError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation => AccountError::DuplicateEmail,
            other => AccountError::Store(other),
        }
    }
}

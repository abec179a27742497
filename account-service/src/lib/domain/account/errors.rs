use std::time::Duration;

use thiserror::Error;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid account id: {0}")]
    InvalidFormat(String),
}

/// Error for UserName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserNameError {
    #[error("User name is required")]
    Empty,

    #[error("User name must be an email address: {0}")]
    InvalidFormat(String),
}

/// Error for optional profile field validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Gender must be one of male, female, other; got {0}")]
    InvalidGender(String),

    #[error("Phone number must contain digits only")]
    InvalidPhone,
}

/// Error for credential shape failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Invalid user name: {0}")]
    UserName(#[from] UserNameError),

    #[error("Password is required")]
    EmptyPassword,
}

/// Failures reported by account storage
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage did not answer within {0:?}")]
    Timeout(Duration),
}

/// Top-level error for account operations.
///
/// The only error kinds that cross the service boundary. Specific causes are logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CredentialsError> for AccountError {
    fn from(err: CredentialsError) -> Self {
        AccountError::InvalidRequest(err.to_string())
    }
}

impl From<UserNameError> for AccountError {
    fn from(err: UserNameError) -> Self {
        AccountError::InvalidRequest(err.to_string())
    }
}

impl From<ProfileError> for AccountError {
    fn from(err: ProfileError) -> Self {
        AccountError::InvalidRequest(err.to_string())
    }
}

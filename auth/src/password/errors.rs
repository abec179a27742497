use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    #[error("Incompatible argon2 version: {0}")]
    IncompatibleVersion(u32),

    #[error("Invalid KDF parameters: {0}")]
    InvalidParams(String),
}

use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::KeyRing;
use crate::jwt::TokenCodec;
use crate::jwt::TokenPurpose;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::settings::AuthSettings;

/// Authentication coordinator combining password verification and token issuance.
///
/// Holds the process-wide hasher, codec and token lifetimes. Everything in here is
/// read-only after construction, so one instance is shared across all requests.
#[derive(Debug, Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// Access and refresh token minted together on login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Errors
    /// * `PasswordError` - KDF parameters are invalid
    /// * `JwtError` - A secret is empty, or access and refresh secrets are equal
    pub fn new(settings: &AuthSettings) -> Result<Self, AuthenticationError> {
        let keys = KeyRing::new(
            settings.access_secret.as_bytes(),
            settings.refresh_secret.as_bytes(),
            settings.cursor_secret.as_bytes(),
        )?;

        Ok(Self {
            password_hasher: PasswordHasher::with_params(settings.kdf)?,
            token_codec: TokenCodec::new(keys, &settings.issuer),
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
        })
    }

    pub fn token_codec(&self) -> &TokenCodec {
        &self.token_codec
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash is malformed or derivation failed
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and mint an access/refresh token pair for `subject`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Password verification failed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.verify_password(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token_pair(subject)?)
    }

    /// Mint an access/refresh token pair without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token_pair(&self, subject: impl ToString) -> Result<TokenPair, JwtError> {
        let subject = subject.to_string();

        Ok(TokenPair {
            access_token: self.issue_access_token(&subject)?,
            refresh_token: self.token_codec.issue(
                &subject,
                TokenPurpose::Refresh,
                self.refresh_ttl,
            )?,
        })
    }

    /// Mint a fresh access token.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_access_token(&self, subject: impl ToString) -> Result<String, JwtError> {
        self.token_codec
            .issue(subject, TokenPurpose::Access, self.access_ttl)
    }

    /// Validate a token that must carry `purpose`.
    ///
    /// # Errors
    /// * `JwtError` - Signature, validity window or purpose check failed
    pub fn validate_token(&self, token: &str, purpose: TokenPurpose) -> Result<Claims, JwtError> {
        self.token_codec.verify(token, purpose)
    }
}

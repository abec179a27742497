use std::fmt;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::claims::TokenPurpose;
use super::errors::JwtError;

/// HMAC secret used to sign and verify tokens of one purpose.
#[derive(Clone)]
pub struct SigningKey {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SigningKey {
    /// Create a signing key from a shared secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is empty
    pub fn from_secret(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidKey("secret must not be empty".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

/// One independently configured signing key per token purpose.
#[derive(Debug, Clone)]
pub struct KeyRing {
    access: SigningKey,
    refresh: SigningKey,
    cursor: SigningKey,
}

impl KeyRing {
    /// Build a key ring from raw secrets.
    ///
    /// # Errors
    /// * `InvalidKey` - A secret is empty, or access and refresh share a secret
    pub fn new(access: &[u8], refresh: &[u8], cursor: &[u8]) -> Result<Self, JwtError> {
        if access == refresh {
            return Err(JwtError::InvalidKey(
                "access and refresh secrets must differ".to_string(),
            ));
        }

        Ok(Self {
            access: SigningKey::from_secret(access)?,
            refresh: SigningKey::from_secret(refresh)?,
            cursor: SigningKey::from_secret(cursor)?,
        })
    }

    /// Key that signs and verifies tokens of `purpose`.
    pub fn key(&self, purpose: TokenPurpose) -> &SigningKey {
        match purpose {
            TokenPurpose::Access => &self.access,
            TokenPurpose::Refresh => &self.refresh,
            TokenPurpose::Cursor => &self.cursor,
        }
    }
}

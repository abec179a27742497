use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::Claims;
use super::claims::TokenPurpose;
use super::errors::JwtError;
use super::keys::KeyRing;
use super::keys::SigningKey;

/// Builds, signs and validates purpose-bound tokens.
///
/// Tokens are compact JWS strings (`header.payload.signature`, base64url) signed with
/// HS256. The codec never picks a verification key from the token itself: callers
/// state which purpose they expect, and that purpose selects the key.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    keys: KeyRing,
    issuer: String,
    algorithm: Algorithm,
}

impl TokenCodec {
    /// Create a codec over a key ring.
    ///
    /// # Arguments
    /// * `keys` - One signing key per token purpose
    /// * `issuer` - Value stamped into the `iss` claim of every new token
    pub fn new(keys: KeyRing, issuer: impl ToString) -> Self {
        Self {
            keys,
            issuer: issuer.to_string(),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn keys(&self) -> &KeyRing {
        &self.keys
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Claims issued now, expiring at `expires_at`, with a fresh random token id.
    pub fn new_claims(
        &self,
        subject: impl ToString,
        purpose: TokenPurpose,
        expires_at: DateTime<Utc>,
    ) -> Claims {
        Claims::new(subject, purpose, Utc::now(), expires_at)
            .with_issuer(&self.issuer)
            .with_token_id(Uuid::new_v4())
    }

    /// Sign claims into a token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn sign(&self, claims: &Claims, key: &SigningKey) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, key.encoding_key())
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode a token and verify its signature and validity window against `key`.
    ///
    /// The purpose tag is returned untouched; use [`TokenCodec::verify`] to also
    /// enforce it.
    ///
    /// # Errors
    /// * `BadSignature` - Signature does not match `key`
    /// * `Expired` - Current time is past `exp`
    /// * `NotYetValid` - Current time is before `nbf`
    /// * `Malformed` - Token cannot be decoded into `Claims`
    pub fn parse(&self, token: &str, key: &SigningKey) -> Result<Claims, JwtError> {
        let token_data = decode::<Claims>(token, key.decoding_key(), &self.validation())?;

        Ok(token_data.claims)
    }

    /// Mint and sign a token for `subject` valid for `ttl`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue(
        &self,
        subject: impl ToString,
        purpose: TokenPurpose,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let claims = self.new_claims(subject, purpose, Utc::now() + ttl);
        self.sign(&claims, self.keys.key(purpose))
    }

    /// Parse a token with the key of `expected` and require a matching purpose tag.
    ///
    /// # Errors
    /// * `WrongPurpose` - Token verified but carries a different purpose
    /// * any error of [`TokenCodec::parse`]
    pub fn verify(&self, token: &str, expected: TokenPurpose) -> Result<Claims, JwtError> {
        let claims = self.parse(token, self.keys.key(expected))?;

        if claims.purpose != expected {
            return Err(JwtError::WrongPurpose {
                expected,
                actual: claims.purpose,
            });
        }

        Ok(claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);
        validation
    }
}

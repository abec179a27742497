use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// What a token may be used for.
///
/// Each purpose is signed with its own key, and a token is only accepted where its
/// purpose is expected. Unknown purposes fail deserialization, so a decoded `Claims`
/// always carries a recognized tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    /// Short-lived token presented on API calls
    Access,
    /// Long-lived token exchanged for new access tokens
    Refresh,
    /// Opaque pagination cursor
    Cursor,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "access",
            TokenPurpose::Refresh => "refresh",
            TokenPurpose::Cursor => "cursor",
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims structure.
///
/// Standard RFC 7519 registered claims plus the purpose tag and an optional string
/// metadata map. Timestamps are whole-second Unix epoch values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier, always serialized as a string)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique token identifier)
    pub jti: String,

    /// Issued at
    pub iat: i64,

    /// Not before
    pub nbf: i64,

    /// Expiration time
    pub exp: i64,

    /// Token purpose
    pub purpose: TokenPurpose,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl Claims {
    /// Create claims valid from `issued_at` until `expires_at`.
    ///
    /// Issuer and token id are left empty; `TokenCodec::new_claims` fills them in.
    pub fn new(
        subject: impl ToString,
        purpose: TokenPurpose,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            iss: String::new(),
            jti: String::new(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            purpose,
            metadata: BTreeMap::new(),
        }
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.iss = iss.to_string();
        self
    }

    /// Set token id.
    pub fn with_token_id(mut self, jti: impl ToString) -> Self {
        self.jti = jti.to_string();
        self
    }

    /// Set expiration.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.exp = expires_at.timestamp();
        self
    }

    /// Add a metadata entry.
    pub fn with_metadata(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Parse the subject into a typed identifier (numeric id, uuid, ...).
    ///
    /// # Errors
    /// * `InvalidSubject` - Subject does not parse as `T`
    pub fn parse_subject<T>(&self) -> Result<T, JwtError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.sub
            .parse::<T>()
            .map_err(|e| JwtError::InvalidSubject(format!("{}: {}", self.sub, e)))
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }

    /// True when `current_timestamp` lies within `[nbf, exp]`.
    pub fn is_valid_at(&self, current_timestamp: i64) -> bool {
        self.nbf <= current_timestamp && !self.is_expired(current_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_new_claims() {
        let now = Utc::now();
        let claims = Claims::new(42, TokenPurpose::Access, now, now + Duration::minutes(15));

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.purpose, TokenPurpose::Access);
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_parse_subject() {
        let now = Utc::now();
        let numeric = Claims::new("1", TokenPurpose::Refresh, now, now);
        assert_eq!(numeric.parse_subject::<i64>(), Ok(1));

        let opaque = Claims::new("a1b2", TokenPurpose::Refresh, now, now);
        assert_eq!(opaque.parse_subject::<String>(), Ok("a1b2".to_string()));
        assert!(matches!(
            opaque.parse_subject::<i64>(),
            Err(JwtError::InvalidSubject(_))
        ));
    }

    #[test]
    fn test_builder_pattern() {
        let now = Utc::now();
        let claims = Claims::new("user123", TokenPurpose::Cursor, now, now)
            .with_issuer("my-service")
            .with_token_id("token-1")
            .with_metadata("page", "3");

        assert_eq!(claims.iss, "my-service");
        assert_eq!(claims.jti, "token-1");
        assert_eq!(claims.metadata("page"), Some("3"));
        assert_eq!(claims.metadata("missing"), None);
    }

    #[test]
    fn test_is_valid_at() {
        let claims = Claims {
            sub: "1".to_string(),
            iss: String::new(),
            jti: String::new(),
            iat: 1000,
            nbf: 1000,
            exp: 2000,
            purpose: TokenPurpose::Access,
            metadata: BTreeMap::new(),
        };

        assert!(!claims.is_valid_at(999)); // Before nbf
        assert!(claims.is_valid_at(1000));
        assert!(claims.is_valid_at(2000)); // Exactly at expiration
        assert!(!claims.is_valid_at(2001));
        assert!(claims.is_expired(2001));
    }

    #[test]
    fn test_purpose_serialization() {
        assert_eq!(
            serde_json::to_string(&TokenPurpose::Refresh).unwrap(),
            "\"refresh\""
        );
        assert!(serde_json::from_str::<TokenPurpose>("\"admin\"").is_err());
    }

    #[test]
    fn test_empty_metadata_is_omitted() {
        let now = Utc::now();
        let claims = Claims::new("1", TokenPurpose::Access, now, now);
        let json = serde_json::to_value(&claims).unwrap();

        assert!(json.get("metadata").is_none());
        assert_eq!(json["purpose"], "access");
    }
}

use chrono::Duration;

use crate::password::KdfParams;

/// Process-wide authentication settings, built once at startup.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    pub cursor_secret: String,
    pub issuer: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub kdf: KdfParams,
}

impl AuthSettings {
    pub const DEFAULT_ISSUER: &'static str = "account-service";

    /// Settings with the given secrets and default lifetimes
    /// (15 minute access tokens, 72 hour refresh tokens).
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
        cursor_secret: impl Into<String>,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            cursor_secret: cursor_secret.into(),
            issuer: Self::DEFAULT_ISSUER.to_string(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::hours(72),
            kdf: KdfParams::default(),
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }
}

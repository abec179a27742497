use std::env;
use std::time::Duration;

use auth::AuthSettings;
use auth::KdfParams;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigBuilder as SourceBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub request_timeout_secs: u64,
    pub secure_cookies: bool,
}

/// Token signing settings. Each purpose has its own secret.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub access_secret: String,
    pub refresh_secret: String,
    pub cursor_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("cursor_secret", &"<redacted>")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_hours", &self.refresh_ttl_hours)
            .finish()
    }
}

/// Argon2id cost parameters for newly created hashes
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__ACCESS_SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = Self::with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        configuration.try_deserialize()
    }

    fn with_defaults() -> Result<SourceBuilder<DefaultState>, ConfigError> {
        let kdf = KdfParams::default();

        ConfigBuilder::builder()
            .set_default("database.max_connections", 5)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("server.http_port", 8080)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("server.secure_cookies", true)?
            .set_default("jwt.issuer", AuthSettings::DEFAULT_ISSUER)?
            .set_default("jwt.access_ttl_minutes", 15)?
            .set_default("jwt.refresh_ttl_hours", 72)?
            .set_default("password.memory_kib", i64::from(kdf.memory_kib))?
            .set_default("password.iterations", i64::from(kdf.iterations))?
            .set_default("password.parallelism", i64::from(kdf.parallelism))
    }

    /// Settings for the shared `Authenticator`.
    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings::new(
            self.jwt.access_secret.clone(),
            self.jwt.refresh_secret.clone(),
            self.jwt.cursor_secret.clone(),
        )
        .with_issuer(self.jwt.issuer.clone())
        .with_ttls(
            chrono::Duration::minutes(self.jwt.access_ttl_minutes),
            chrono::Duration::hours(self.jwt.refresh_ttl_hours),
        )
        .with_kdf(KdfParams {
            memory_kib: self.password.memory_kib,
            iterations: self.password.iterations,
            parallelism: self.password.parallelism,
            ..KdfParams::default()
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

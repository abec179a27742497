//! Authentication and session core.
//!
//! Provides the pieces that carry real security weight, with no I/O of their own:
//! - Password hashing (Argon2id, self-describing PHC strings)
//! - Purpose-bound JWT issuance and validation (HS256, one key per purpose)
//! - An `Authenticator` coordinating both from explicit `AuthSettings`
//!
//! Services own identity lookup and transport; they hand this crate plaintext
//! passwords, stored hashes, subjects and presented tokens.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Purpose-bound Tokens
//! ```
//! use auth::{KeyRing, TokenCodec, TokenPurpose};
//! use chrono::Duration;
//!
//! let keys = KeyRing::new(b"access-secret", b"refresh-secret", b"cursor-secret").unwrap();
//! let codec = TokenCodec::new(keys, "my-service");
//! let token = codec.issue(42, TokenPurpose::Access, Duration::minutes(15)).unwrap();
//!
//! let claims = codec.verify(&token, TokenPurpose::Access).unwrap();
//! assert_eq!(claims.sub, "42");
//! assert!(codec.verify(&token, TokenPurpose::Refresh).is_err());
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{AuthSettings, Authenticator, TokenPurpose};
//!
//! let settings = AuthSettings::new("access-secret", "refresh-secret", "cursor-secret");
//! let auth = Authenticator::new(&settings).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and mint a token pair
//! let pair = auth.authenticate("password123", &hash, 1).unwrap();
//!
//! // Refresh: exchange the refresh token for a new access token
//! let claims = auth.validate_token(&pair.refresh_token, TokenPurpose::Refresh).unwrap();
//! let access_token = auth.issue_access_token(&claims.sub).unwrap();
//! # assert!(!access_token.is_empty());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod settings;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::KeyRing;
pub use jwt::SigningKey;
pub use jwt::TokenCodec;
pub use jwt::TokenPurpose;
pub use password::KdfParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use settings::AuthSettings;

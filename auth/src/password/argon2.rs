use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::Output;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use serde::Deserialize;

use super::errors::PasswordError;

const SALT_LENGTH: usize = 16;
const SALT_BUFFER_LENGTH: usize = 64;

const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
const DEFAULT_ITERATIONS: u32 = 3;
const DEFAULT_PARALLELISM: u32 = 2;
const DEFAULT_KEY_LENGTH: usize = 32;

// Evaluated at compile time, so invalid defaults fail the build.
const DEFAULT_PARAMS: Params = match Params::new(
    DEFAULT_MEMORY_KIB,
    DEFAULT_ITERATIONS,
    DEFAULT_PARALLELISM,
    Some(DEFAULT_KEY_LENGTH),
) {
    Ok(params) => params,
    Err(_) => panic!("default argon2 parameters are out of range"),
};

/// Upper bounds on costs accepted from a stored hash during verification.
const MAX_VERIFY_MEMORY_KIB: u32 = 1024 * 1024;
const MAX_VERIFY_ITERATIONS: u32 = 64;
const MAX_VERIFY_PARALLELISM: u32 = 16;

/// Cost parameters for the Argon2id key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
    /// Length of the derived key in bytes
    #[serde(default = "KdfParams::default_key_length")]
    pub key_length: usize,
}

impl KdfParams {
    const fn default_key_length() -> usize {
        DEFAULT_KEY_LENGTH
    }

    fn to_argon2(self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(self.key_length),
        )
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))
    }
}

impl Default for KdfParams {
    /// 64 MiB, 3 iterations, 2 lanes, 32 byte key.
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
            key_length: DEFAULT_KEY_LENGTH,
        }
    }
}

/// Password hashing implementation.
///
/// Produces self-describing PHC strings
/// (`$argon2id$v=19$m=65536,t=3,p=2$<salt>$<key>`). Verification always uses the
/// parameters embedded in the stored hash, so raising the configured cost does not
/// invalidate hashes created under older settings.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a new password hasher with the default cost parameters.
    pub fn new() -> Self {
        Self {
            params: DEFAULT_PARAMS,
        }
    }

    /// Create a password hasher with custom cost parameters.
    ///
    /// # Errors
    /// * `InvalidParams` - Parameters are outside the ranges argon2 accepts, or above
    ///   what `verify` accepts from a stored hash
    pub fn with_params(params: KdfParams) -> Result<Self, PasswordError> {
        let params = params.to_argon2()?;
        check_verify_ceiling(&params).map_err(PasswordError::InvalidParams)?;
        Ok(Self { params })
    }

    /// Hash a plaintext password with a fresh 128-bit random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, version, parameters, salt, and key)
    ///
    /// # Errors
    /// * `HashingFailed` - Entropy source or key derivation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| PasswordError::HashingFailed(format!("failed to generate salt: {}", e)))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        self.argon2(self.params.clone())
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The key is re-derived with the parameters parsed out of `encoded_hash` and
    /// compared in constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `encoded_hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Hash string cannot be parsed into argon2id fields, or its
    ///   costs exceed the verification ceiling
    /// * `IncompatibleVersion` - Hash was produced by an unsupported argon2 version
    /// * `HashingFailed` - Key derivation failed
    pub fn verify(&self, password: &str, encoded_hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(encoded_hash)
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        if parsed.algorithm != argon2::ARGON2ID_IDENT {
            return Err(PasswordError::MalformedHash(format!(
                "unsupported algorithm: {}",
                parsed.algorithm
            )));
        }

        let version = parsed
            .version
            .ok_or_else(|| PasswordError::MalformedHash("missing version".to_string()))?;
        if version != Version::V0x13 as u32 {
            return Err(PasswordError::IncompatibleVersion(version));
        }

        let params =
            Params::try_from(&parsed).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        check_verify_ceiling(&params).map_err(PasswordError::MalformedHash)?;
        let salt = parsed
            .salt
            .ok_or_else(|| PasswordError::MalformedHash("missing salt".to_string()))?;
        let expected = parsed
            .hash
            .ok_or_else(|| PasswordError::MalformedHash("missing key".to_string()))?;

        let mut salt_buffer = [0u8; SALT_BUFFER_LENGTH];
        let salt_bytes = salt
            .decode_b64(&mut salt_buffer)
            .map_err(|e| PasswordError::MalformedHash(format!("invalid salt: {}", e)))?;

        let mut derived = vec![0u8; expected.len()];
        self.argon2(params)
            .hash_password_into(password.as_bytes(), salt_bytes, &mut derived)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        let derived =
            Output::new(&derived).map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        // `Output` equality is constant time.
        Ok(expected == derived)
    }

    fn argon2(&self, params: Params) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    }
}

fn check_verify_ceiling(params: &Params) -> Result<(), String> {
    if params.m_cost() > MAX_VERIFY_MEMORY_KIB {
        return Err(format!(
            "memory cost {} KiB exceeds limit of {} KiB",
            params.m_cost(),
            MAX_VERIFY_MEMORY_KIB
        ));
    }
    if params.t_cost() > MAX_VERIFY_ITERATIONS {
        return Err(format!(
            "iteration count {} exceeds limit of {}",
            params.t_cost(),
            MAX_VERIFY_ITERATIONS
        ));
    }
    if params.p_cost() > MAX_VERIFY_PARALLELISM {
        return Err(format!(
            "parallelism {} exceeds limit of {}",
            params.p_cost(),
            MAX_VERIFY_PARALLELISM
        ));
    }
    Ok(())
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::with_params(KdfParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            key_length: 32,
        })
        .expect("valid params")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));

        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_embeds_default_parameters() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("secret").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$v=19$m=65536,t=3,p=2$"));
        assert_eq!(hash.split('$').count(), 6);
    }

    #[test]
    fn test_new_matches_default_kdf_params() {
        let configured = PasswordHasher::with_params(KdfParams::default()).unwrap();
        assert_eq!(PasswordHasher::new().params, configured.params);
        assert_eq!(PasswordHasher::default().params, configured.params);
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = cheap_hasher();

        let first = hasher.hash("secret").unwrap();
        let second = hasher.hash("secret").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("secret", &first).unwrap());
        assert!(hasher.verify("secret", &second).unwrap());
    }

    #[test]
    fn test_verify_uses_parameters_from_hash() {
        let old = cheap_hasher();
        let hash = old.hash("secret").unwrap();

        // A hasher configured with different costs still verifies the old hash.
        let current = PasswordHasher::new();
        assert!(current.verify("secret", &hash).unwrap());
        assert!(!current.verify("Secret", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "not-a-valid-hash");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_verify_missing_fields() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "$argon2id$v=19$m=65536,t=3,p=2");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_verify_incompatible_version() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("secret").unwrap();
        let downgraded = hash.replace("$v=19$", "$v=16$");

        let result = hasher.verify("secret", &downgraded);
        assert_eq!(result, Err(PasswordError::IncompatibleVersion(16)));
    }

    #[test]
    fn test_verify_rejects_other_algorithms() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("secret").unwrap();
        let other = hash.replace("$argon2id$", "$argon2i$");

        let result = hasher.verify("secret", &other);
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }

    #[test]
    fn test_with_params_rejects_invalid_costs() {
        let result = PasswordHasher::with_params(KdfParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
            key_length: 32,
        });
        assert!(matches!(result, Err(PasswordError::InvalidParams(_))));
    }

    #[test]
    fn test_with_params_rejects_costs_verify_would_refuse() {
        let result = PasswordHasher::with_params(KdfParams {
            memory_kib: 2 * 1024 * 1024,
            ..KdfParams::default()
        });
        assert!(matches!(result, Err(PasswordError::InvalidParams(_))));
    }

    #[test]
    fn test_verify_rejects_memory_cost_above_ceiling() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("secret").unwrap();
        let inflated = hash.replace("$m=1024,", "$m=4194304,");
        assert_ne!(hash, inflated);

        let result = hasher.verify("secret", &inflated);
        assert!(matches!(result, Err(PasswordError::MalformedHash(ref m)) if m.contains("memory cost")));
    }

    #[test]
    fn test_verify_rejects_iterations_above_ceiling() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("secret").unwrap();
        let inflated = hash.replace(",t=1,", ",t=1000000,");
        assert_ne!(hash, inflated);

        let result = hasher.verify("secret", &inflated);
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }
}

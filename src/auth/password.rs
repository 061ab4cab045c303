use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
};
use rand::thread_rng;

pub const MIN_PASSWORD_BYTES: usize = 8;
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password must be between {MIN_PASSWORD_BYTES} and {MAX_PASSWORD_BYTES} bytes")]
    Length,
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Argon2id with a fixed parameter set for new hashes. Verification reads the
/// parameters back out of the stored PHC string, so older hashes keep working
/// after the cost changes.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Smallest parameters argon2 accepts. Only meant for tests.
    pub fn fast() -> Self {
        match Params::new(Params::MIN_M_COST, 1, 1, None) {
            Ok(params) => Self { params },
            Err(_) => Self::default(),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        check_length(password)?;

        let salt = SaltString::generate(&mut thread_rng());
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordError::Hash(err.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// A hash that does not parse never verifies.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

pub fn check_length(password: &str) -> Result<(), PasswordError> {
    if !(MIN_PASSWORD_BYTES..=MAX_PASSWORD_BYTES).contains(&password.len()) {
        return Err(PasswordError::Length);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PasswordError, PasswordHasher};

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hasher = PasswordHasher::fast();
        let hash = hasher.hash("password1").expect("hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("password1", &hash));
        assert!(!hasher.verify("password2", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = PasswordHasher::fast();
        let first = hasher.hash("password1").expect("hash should succeed");
        let second = hasher.hash("password1").expect("hash should succeed");

        assert_ne!(first, second);
    }

    #[test]
    fn verify_reads_params_from_stored_hash() {
        let hash = PasswordHasher::fast()
            .hash("password1")
            .expect("hash should succeed");

        assert!(PasswordHasher::default().verify("password1", &hash));
    }

    #[test]
    fn enforces_byte_length_bounds() {
        let hasher = PasswordHasher::fast();

        assert!(matches!(hasher.hash("short"), Err(PasswordError::Length)));
        assert!(hasher.hash(&"a".repeat(8)).is_ok());
        assert!(hasher.hash(&"a".repeat(72)).is_ok());
        assert!(matches!(
            hasher.hash(&"a".repeat(73)),
            Err(PasswordError::Length)
        ));
        // 24 three-byte chars = 72 bytes, 25 = 75 bytes.
        assert!(hasher.hash(&"€".repeat(24)).is_ok());
        assert!(matches!(
            hasher.hash(&"€".repeat(25)),
            Err(PasswordError::Length)
        ));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!PasswordHasher::fast().verify("password1", "not-a-phc-string"));
    }
}

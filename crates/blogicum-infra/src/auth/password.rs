//! Argon2id password hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use blogicum_core::ports::{AuthError, PasswordService};

/// Stores passwords as PHC strings (`$argon2id$v=19$...`), so the cost
/// parameters travel with each hash and old hashes keep verifying after
/// the cost changes.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    /// The argon2 crate's recommended cost.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// A custom cost: `memory_kib` of memory over `iterations` passes.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let stored = PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &stored)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2PasswordService {
        Argon2PasswordService::with_cost(1024, 1).unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let service = cheap();

        let hash = service.hash("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify("correct-horse", &hash).unwrap());
        assert!(!service.verify("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let service = cheap();

        assert_ne!(service.hash("same").unwrap(), service.hash("same").unwrap());
    }

    #[test]
    fn test_hash_from_other_cost_still_verifies() {
        let hash = cheap().hash("correct-horse").unwrap();

        assert!(Argon2PasswordService::new().verify("correct-horse", &hash).unwrap());
    }

    #[test]
    fn test_unreadable_hash_is_an_error() {
        assert!(matches!(
            cheap().verify("password", "not-a-hash"),
            Err(AuthError::HashingError(_))
        ));
    }

    #[test]
    fn test_invalid_cost_is_rejected() {
        assert!(Argon2PasswordService::with_cost(1, 0).is_err());
    }
}

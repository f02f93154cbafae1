//! Argon2id password hashing and the account password policy.

use argon2::{
    ARGON2ID_IDENT, Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use daybook_core::ports::{AuthError, PasswordService};

/// Rules a user-chosen password must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum length in characters, not bytes.
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    /// Reads `PASSWORD_MIN_LENGTH`; values below the default are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let min_length = std::env::var("PASSWORD_MIN_LENGTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|len| *len >= defaults.min_length)
            .unwrap_or(defaults.min_length);

        Self { min_length }
    }

    fn check(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.min_length {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }
        Ok(())
    }
}

/// Argon2id password service.
///
/// Hashes produced under older or cheaper parameters still verify, and are
/// reported by `needs_rehash` so a successful login can upgrade them.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
    policy: PasswordPolicy,
}

impl Argon2PasswordService {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self::with_params(policy, Params::default())
    }

    pub fn with_params(policy: PasswordPolicy, params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            policy,
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new(PasswordPolicy::default())
    }
}

impl PasswordService for Argon2PasswordService {
    fn check_policy(&self, password: &str) -> Result<(), AuthError> {
        self.policy.check(password)
    }

    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn needs_rehash(&self, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return true;
        };
        if parsed.algorithm != ARGON2ID_IDENT || parsed.version != Some(Version::V0x13 as u32) {
            return true;
        }

        let current = self.argon2.params();
        match Params::try_from(&parsed) {
            Ok(stored) => {
                stored.m_cost() < current.m_cost()
                    || stored.t_cost() < current.t_cost()
                    || stored.p_cost() != current.p_cost()
            }
            Err(_) => true,
        }
    }
}

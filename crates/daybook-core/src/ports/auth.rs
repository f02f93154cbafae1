//! Authentication and authorization ports.

use uuid::Uuid;

/// Claims carried by an access token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub exp: i64,
}

/// Identity provider: issues and verifies signed tokens.
pub trait TokenService: Send + Sync {
    /// Generate an access token for a user.
    fn generate_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Validate and decode an access token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Access token lifetime.
    fn expiration_seconds(&self) -> i64;

    /// Generate a short-lived password reset token.
    fn generate_reset_token(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// Validate a password reset token and return the user it was issued for.
    fn validate_reset_token(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// Password hashing service. Owns the password policy.
pub trait PasswordService: Send + Sync {
    /// Reject a password the policy does not accept, with `AuthError::WeakPassword`.
    fn check_policy(&self, password: &str) -> Result<(), AuthError>;

    /// Hash a plain text password without consulting the policy.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;

    /// Whether `hash` was produced with weaker settings than new hashes get.
    fn needs_rehash(&self, hash: &str) -> bool;

    /// Hash a password chosen by the user, after checking it against the policy.
    fn hash_new(&self, password: &str) -> Result<String, AuthError> {
        self.check_policy(password)?;
        self.hash(password)
    }
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("{0}")]
    WeakPassword(String),
}

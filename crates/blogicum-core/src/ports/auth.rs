//! Sessions and password storage.
//!
//! A signed-in visitor carries a token naming their user id and username.
//! Passwords are only ever stored as salted hashes.

/// What a valid session token says about its bearer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: i64,
    pub username: String,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
}

/// Issues and checks session tokens.
pub trait TokenService: Send + Sync {
    fn generate_token(&self, user_id: i64, username: &str) -> Result<String, AuthError>;

    /// Decode `token`, rejecting forged, foreign and expired ones.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// How long an issued token stays valid; also the session cookie's max-age.
    fn expiration_seconds(&self) -> i64;
}

/// One-way password hashing.
pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` on a wrong password; `Err` only when `hash` is unreadable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no session token")]
    MissingToken,

    #[error("session token expired")]
    TokenExpired,

    #[error("invalid session token: {0}")]
    InvalidToken(String),

    #[error("password hashing failed: {0}")]
    HashingError(String),
}

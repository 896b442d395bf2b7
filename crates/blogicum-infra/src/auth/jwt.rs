//! JWT session tokens.
//!
//! A token is issued on login and carried back in the `access_token` cookie
//! (or an `Authorization: Bearer` header). Logging out clears the cookie;
//! there is no server-side session table.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use blogicum_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";
const DEFAULT_ISSUER: &str = "blogicum";
const DEFAULT_LIFETIME_HOURS: i64 = 24;

/// Signing secret, token lifetime and the `iss` claim.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: DEFAULT_LIFETIME_HOURS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    /// `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SECRET.to_string());

        if secret == DEFAULT_SECRET {
            if running_in_production() {
                tracing::error!("JWT_SECRET is not set; sessions are signed with the public default secret");
            } else {
                tracing::warn!("JWT_SECRET is not set; using the development default");
            }
        }

        Self {
            secret,
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_LIFETIME_HOURS),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
        }
    }
}

fn running_in_production() -> bool {
    std::env::var("RUST_ENV")
        .map(|v| matches!(v.as_str(), "production" | "prod"))
        .unwrap_or(false)
}

/// The token payload. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    username: String,
    iat: i64,
    exp: i64,
    iss: String,
}

/// HS256-signed session tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: i64, username: &str) -> Result<String, AuthError> {
        let issued_at = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + TimeDelta::hours(self.config.expiration_hours)).timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?
            .claims;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken(format!("subject {:?} is not a user id", claims.sub)))?;

        Ok(TokenClaims {
            user_id,
            username: claims.username,
            exp: claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "blog-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "blogicum-test".to_string(),
        }
    }

    #[test]
    fn test_issued_token_names_the_user() {
        let service = JwtTokenService::new(config());

        let token = service.generate_token(42, "alice").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let service = JwtTokenService::new(config());

        assert!(matches!(
            service.validate_token("not.a.token"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let ours = JwtTokenService::new(config());
        let theirs = JwtTokenService::new(JwtConfig {
            secret: "someone-else".to_string(),
            ..config()
        });

        let token = theirs.generate_token(1, "mallory").unwrap();

        assert!(matches!(
            ours.validate_token(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_token_from_other_issuer_is_rejected() {
        let ours = JwtTokenService::new(config());
        let theirs = JwtTokenService::new(JwtConfig {
            issuer: "another-blog".to_string(),
            ..config()
        });

        let token = theirs.generate_token(1, "alice").unwrap();

        assert!(ours.validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_hours: -2,
            ..config()
        });

        let token = service.generate_token(1, "alice").unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_cookie_lifetime_matches_token_lifetime() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_hours: 24,
            ..config()
        });

        assert_eq!(service.expiration_seconds(), 24 * 3600);
    }
}

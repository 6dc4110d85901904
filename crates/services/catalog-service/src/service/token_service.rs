//! Signed, time-bound identity tokens.
//!
//! Tokens are HMAC-signed JWTs carrying the user id as `sub`. Every failure
//! during verification collapses into `AppError::Unauthorized`; the reason
//! is only visible in debug logs.

use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult, ConfigError, JwtConfig};
use domain::{MIN_JWT_SECRET_LENGTH, SECONDS_PER_MINUTE};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly issued token and its lifetime in seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Token issuer/verifier for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token for `subject` with the configured lifetime.
    fn issue(&self, subject: Uuid) -> AppResult<IssuedToken>;

    /// Issue a token for `subject` valid for `ttl`.
    fn issue_with_ttl(&self, subject: Uuid, ttl: Duration) -> AppResult<IssuedToken>;

    /// Return the subject of a valid, unexpired token.
    fn verify(&self, token: &str) -> AppResult<Uuid>;
}

/// HMAC JWT implementation of TokenService
pub struct JwtTokens {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokens")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtTokens {
    /// Build from configuration; the key is fixed for the process lifetime.
    pub fn new(config: &JwtConfig) -> Result<Self, ConfigError> {
        if config.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::invalid(
                "JWT_SECRET",
                format!("must be at least {} characters", MIN_JWT_SECRET_LENGTH),
            ));
        }

        let algorithm = Algorithm::from_str(config.algorithm.trim())
            .map_err(|_| ConfigError::invalid("JWT_ALGORITHM", "unknown algorithm"))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(ConfigError::invalid(
                "JWT_ALGORITHM",
                "only HS256, HS384 and HS512 are supported",
            ));
        }

        if config.expiration_minutes <= 0 {
            return Err(ConfigError::invalid(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                "must be positive",
            ));
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::seconds(config.expiration_minutes * SECONDS_PER_MINUTE),
        })
    }

    /// Issue a token as if the current time were `issued_at` (unix seconds).
    pub fn issue_at(&self, subject: Uuid, issued_at: i64, ttl: Duration) -> AppResult<IssuedToken> {
        let expires_in = ttl.num_seconds();
        let claims = Claims {
            sub: subject,
            iat: issued_at,
            exp: issued_at + expires_in,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok(IssuedToken { token, expires_in })
    }

    /// Verify a token as if the current time were `now` (unix seconds).
    ///
    /// A token is valid while `now < exp`; no leeway is applied.
    pub fn verify_at(&self, token: &str, now: i64) -> AppResult<Uuid> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("Token rejected: {:?}", e.kind());
                AppError::Unauthorized
            })?
            .claims;

        if now >= claims.exp {
            tracing::debug!("Token rejected: expired");
            return Err(AppError::Unauthorized);
        }

        Ok(claims.sub)
    }
}

impl TokenService for JwtTokens {
    fn issue(&self, subject: Uuid) -> AppResult<IssuedToken> {
        self.issue_with_ttl(subject, self.ttl)
    }

    fn issue_with_ttl(&self, subject: Uuid, ttl: Duration) -> AppResult<IssuedToken> {
        self.issue_at(subject, Utc::now().timestamp(), ttl)
    }

    fn verify(&self, token: &str) -> AppResult<Uuid> {
        self.verify_at(token, Utc::now().timestamp())
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::{debug, instrument, warn};

use super::types::AuthClaims;
use crate::config::AuthConfig;
use crate::shared::{AppError, AuthFailure};

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration: Duration::hours(expiration_hours),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.expiration_hours)
    }

    /// Creates a new JWT token for the given user
    #[instrument(skip(self))]
    pub fn create_token(&self, user_id: &str) -> Result<String, AppError> {
        self.create_token_with_ttl(user_id, self.expiration)
    }

    /// Creates a token with an explicit lifetime; a negative `ttl` yields an already-expired token
    #[instrument(skip(self))]
    pub fn create_token_with_ttl(&self, user_id: &str, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| {
                warn!(ttl_seconds = ttl.num_seconds(), "Token lifetime overflows the timestamp range");
                AppError::Internal
            })?
            .timestamp()
            .max(0) as usize;

        debug!(exp_timestamp = exp, "Creating JWT token with expiration");

        let claims = AuthClaims {
            sub: user_id.to_string(),
            exp,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates a JWT token and returns the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<AuthClaims, AppError> {
        debug!("Decoding and validating JWT token");

        decode::<AuthClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| {
            debug!(
                user_id = %data.claims.sub,
                exp = data.claims.exp,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized(AuthFailure::ExpiredToken),
                _ => AppError::Unauthorized(AuthFailure::InvalidToken),
            }
        })
    }
}

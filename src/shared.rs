use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::{password::PasswordHasher, token::TokenConfig};
use crate::cafe::{repository::CafeRepository, schema::ValidationErrors};
use crate::user::repository::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub cafe_repository: Arc<dyn CafeRepository + Send + Sync>,
    pub token_config: TokenConfig,
    pub password_hasher: Arc<dyn PasswordHasher>,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        cafe_repository: Arc<dyn CafeRepository + Send + Sync>,
        token_config: TokenConfig,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            cafe_repository,
            token_config,
            password_hasher,
        }
    }
}

/// Why a request was turned away by the authorization guard
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("No token provided")]
    NoToken,

    #[error("Not authorized")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Cafe validation failed: {0}")]
    InvalidUpdate(ValidationErrors),

    #[error("Invalid ID format")]
    InvalidId,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(AuthFailure),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{message}")]
    Http { status: StatusCode, message: String },

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::Http {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidUpdate(_)
            | AppError::InvalidId
            | AppError::DuplicateEmail
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Http { status, .. } => *status,
            AppError::JwtError(_) | AppError::DatabaseError(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Http {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::Validation(errors) => json!({
                "error": "Validation failed",
                "details": errors,
            }),
            AppError::DuplicateEmail | AppError::InvalidCredentials => json!({
                "message": self.to_string()
            }),
            AppError::NotFound(message) | AppError::Http { message, .. } => json!({
                "error": message
            }),
            AppError::InvalidUpdate(_) | AppError::InvalidId | AppError::Unauthorized(_) => {
                json!({ "error": self.to_string() })
            }
            AppError::JwtError(_) | AppError::DatabaseError(_) | AppError::Internal => {
                json!({ "error": "Server error" })
            }
        };

        if status.is_server_error() {
            error!(error = %self, "Request failed with server error");
        } else {
            warn!(status = %status, error = %self, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::auth::password::Argon2Hasher;
    use crate::cafe::repository::InMemoryCafeRepository;
    use crate::user::repository::InMemoryUserRepository;

    pub const TEST_SECRET: &str = "test-secret";

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        user_repository: Option<Arc<dyn UserRepository + Send + Sync>>,
        cafe_repository: Option<Arc<dyn CafeRepository + Send + Sync>>,
        token_config: Option<TokenConfig>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                user_repository: None,
                cafe_repository: None,
                token_config: None,
            }
        }

        pub fn with_user_repository(mut self, repo: Arc<dyn UserRepository + Send + Sync>) -> Self {
            self.user_repository = Some(repo);
            self
        }

        pub fn with_cafe_repository(mut self, repo: Arc<dyn CafeRepository + Send + Sync>) -> Self {
            self.cafe_repository = Some(repo);
            self
        }

        pub fn with_token_config(mut self, token_config: TokenConfig) -> Self {
            self.token_config = Some(token_config);
            self
        }

        pub fn build(self) -> AppState {
            AppState {
                user_repository: self
                    .user_repository
                    .unwrap_or_else(|| Arc::new(InMemoryUserRepository::new())),
                cafe_repository: self
                    .cafe_repository
                    .unwrap_or_else(|| Arc::new(InMemoryCafeRepository::new())),
                token_config: self
                    .token_config
                    .unwrap_or_else(|| TokenConfig::new(TEST_SECRET, 1)),
                password_hasher: Arc::new(Argon2Hasher::lightweight()),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cafe::schema::FieldError;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let mut errors = ValidationErrors::default();
        errors.push(FieldError::required("phone"));
        errors.push(FieldError::required("latitude"));

        let (status, body) = body_json(AppError::Validation(errors)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"]["phone"]["kind"], "required");
        assert!(body["details"].get("latitude").is_some());
    }

    #[tokio::test]
    async fn test_unauthorized_messages() {
        let (status, body) = body_json(AppError::Unauthorized(AuthFailure::NoToken)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "No token provided");

        let (_, body) = body_json(AppError::Unauthorized(AuthFailure::ExpiredToken)).await;
        assert_eq!(body["error"], "Token expired");
    }

    #[tokio::test]
    async fn test_credential_errors_use_message_key() {
        let (status, body) = body_json(AppError::DuplicateEmail).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email already exists");
    }

    #[tokio::test]
    async fn test_server_errors_do_not_leak_details() {
        let (status, body) =
            body_json(AppError::DatabaseError("connection refused on 10.0.0.3".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Server error");
    }

    #[tokio::test]
    async fn test_explicit_status_is_preserved() {
        let error = AppError::Http {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected JSON".to_string(),
        };
        let (status, body) = body_json(error).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"], "Expected JSON");
    }
}

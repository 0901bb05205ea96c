use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    password::PasswordHasher,
    token::TokenConfig,
    types::{AuthResponse, LoginRequest, RegisterRequest, UserResponse},
};
use crate::shared::AppError;
use crate::user::{UserModel, UserRepository};

/// Service for registration and login
pub struct AuthService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    token_config: TokenConfig,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    pub fn new(
        repository: Arc<dyn UserRepository + Send + Sync>,
        token_config: TokenConfig,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            repository,
            token_config,
            hasher,
        }
    }

    /// Registers a new user and issues their first token
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        let username = request.username.trim();
        if username.is_empty() || request.email.trim().is_empty() || request.password.is_empty()
        {
            return Err(AppError::bad_request(
                "Username, email and password are required",
            ));
        }

        if self.repository.find_by_email(&request.email).await?.is_some() {
            warn!("Registration attempted with an existing email");
            return Err(AppError::DuplicateEmail);
        }

        let password_hash = self.hash_password(request.password).await?;
        let user = UserModel::new(username.to_string(), &request.email, password_hash);

        // The store enforces uniqueness too, for concurrent registrations
        self.repository.create_user(&user).await?;

        let token = self.token_config.create_token(&user.id)?;
        info!(user_id = %user.id, "User registered");

        Ok(AuthResponse {
            token,
            user: UserResponse::from(&user),
        })
    }

    /// Checks credentials and issues a token
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let user = match self.repository.find_by_email(&request.email).await? {
            Some(user) => user,
            None => {
                warn!("Login attempted for unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self
            .verify_password(request.password, user.password_hash.clone())
            .await?
        {
            warn!(user_id = %user.id, "Login attempted with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.token_config.create_token(&user.id)?;
        info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            token,
            user: UserResponse::from(&user),
        })
    }

    /// Argon2 is CPU and memory heavy, so it runs on the blocking pool
    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                warn!(error = %e, "Password hashing task failed");
                AppError::Internal
            })?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AppError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                warn!(error = %e, "Password verification task failed");
                AppError::Internal
            })?
    }
}

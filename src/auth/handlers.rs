use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::AuthService,
    types::{AuthResponse, LoginRequest, RegisterRequest},
};
use crate::shared::{AppError, AppState};

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(
        Arc::clone(&state.user_repository),
        state.token_config.clone(),
        Arc::clone(&state.password_hasher),
    )
}

/// HTTP handler for registering a user
///
/// POST /api/auth/register
/// Returns a token and the public user record
#[instrument(name = "register", skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let Json(request) = payload?;
    info!("Registering new user");

    let response = auth_service(&state).register(request).await?;

    info!(user_id = %response.user.id, "Registration completed");
    Ok((StatusCode::CREATED, Json(response)))
}

/// HTTP handler for logging in
///
/// POST /api/auth/login
#[instrument(name = "login", skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(request) = payload?;
    info!("Logging in user");

    let response = auth_service(&state).login(request).await?;

    info!(user_id = %response.user.id, "Login completed");
    Ok(Json(response))
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{models::CafeModel, service::CafeService, types::DeleteResponse};
use crate::auth::AuthClaims;
use crate::shared::{AppError, AppState};

fn cafe_service(state: &AppState) -> CafeService {
    CafeService::new(
        Arc::clone(&state.cafe_repository),
        Arc::clone(&state.user_repository),
    )
}

/// Unwraps a JSON body that must be an object
fn body_object(payload: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    match payload? {
        Json(Value::Object(body)) => Ok(body),
        Json(_) => Err(AppError::bad_request("Request body must be a JSON object")),
    }
}

/// HTTP handler for creating a café
///
/// POST /api/cafes (auth required)
/// Returns the created record with generated ID and timestamps
#[instrument(name = "create_cafe", skip(state, claims, payload), fields(user_id = %claims.sub))]
pub async fn create_cafe(
    State(state): State<AppState>,
    Extension(claims): Extension<AuthClaims>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CafeModel>), AppError> {
    let body = body_object(payload)?;
    info!("Creating new cafe");

    let cafe = cafe_service(&state)
        .create_cafe(claims.user_id(), &body)
        .await?;

    Ok((StatusCode::CREATED, Json(cafe)))
}

/// HTTP handler for listing all cafés
///
/// GET /api/cafes
#[instrument(name = "list_cafes", skip(state))]
pub async fn list_cafes(State(state): State<AppState>) -> Result<Json<Vec<CafeModel>>, AppError> {
    info!("Listing all cafes");

    let cafes = cafe_service(&state).list_cafes().await?;

    Ok(Json(cafes))
}

/// HTTP handler for fetching one café
///
/// GET /api/cafes/:id
#[instrument(name = "get_cafe", skip(state))]
pub async fn get_cafe(
    State(state): State<AppState>,
    Path(cafe_id): Path<String>,
) -> Result<Json<CafeModel>, AppError> {
    info!(cafe_id = %cafe_id, "Fetching cafe");

    let cafe = cafe_service(&state).get_cafe(&cafe_id).await?;

    Ok(Json(cafe))
}

/// HTTP handler for partially updating a café
///
/// PUT /api/cafes/:id (auth required, any user)
#[instrument(name = "update_cafe", skip(state, claims, payload), fields(user_id = %claims.sub))]
pub async fn update_cafe(
    State(state): State<AppState>,
    Path(cafe_id): Path<String>,
    Extension(claims): Extension<AuthClaims>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CafeModel>, AppError> {
    let patch = body_object(payload)?;
    info!(cafe_id = %cafe_id, fields = patch.len(), "Updating cafe");

    let cafe = cafe_service(&state).update_cafe(&cafe_id, &patch).await?;

    Ok(Json(cafe))
}

/// HTTP handler for deleting a café
///
/// DELETE /api/cafes/:id (auth required, owner only)
#[instrument(name = "delete_cafe", skip(state, claims), fields(user_id = %claims.sub))]
pub async fn delete_cafe(
    State(state): State<AppState>,
    Path(cafe_id): Path<String>,
    Extension(claims): Extension<AuthClaims>,
) -> Result<Json<DeleteResponse>, AppError> {
    info!(cafe_id = %cafe_id, "Deleting cafe");

    cafe_service(&state)
        .delete_cafe(&cafe_id, claims.user_id())
        .await?;

    Ok(Json(DeleteResponse {
        message: "Cafe deleted successfully".to_string(),
    }))
}

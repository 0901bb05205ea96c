use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{auth, cafe, shared::AppState};

/// Builds the full HTTP surface: public routes, guarded routes and the 404 fallback
pub fn build_router(app_state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/cafes", get(cafe::list_cafes))
        .route("/api/cafes/:id", get(cafe::get_cafe));

    let protected = Router::new()
        .route("/api/cafes", post(cafe::create_cafe))
        .route("/api/cafes/:id", put(cafe::update_cafe).delete(cafe::delete_cafe))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::jwt_auth,
        ));

    public
        .merge(protected)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

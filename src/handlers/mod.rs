// handlers/mod.rs - HTTP handlers
//
// Public: /, /health, /auth/send-code, /auth/register, /auth/login
// Protected (bearer token): /auth/me, /dogs, /dogs/:dog_id

pub mod auth;
pub mod dogs;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Doggy Meetup API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/auth/send-code, /auth/register, /auth/login (public)",
                "me": "/auth/me (bearer token)",
                "dogs": "/dogs[/:dog_id] (bearer token)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.identities.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            ApiError::service_unavailable("database unavailable").into_response()
        }
    }
}

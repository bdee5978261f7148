// handlers/dogs.rs - dog profiles; mutations are owner-only

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{Dog, DogCreate, DogUpdate};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, ValidatedJson};

/// GET /dogs - the caller's dogs, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
) -> ApiResult<Vec<Dog>> {
    let dogs = state.dogs.list_mine(&caller).await?;
    Ok(ApiResponse::success(dogs))
}

/// POST /dogs - create a dog owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    ValidatedJson(body): ValidatedJson<DogCreate>,
) -> ApiResult<Dog> {
    let dog = state.dogs.create(&caller, body).await?;
    Ok(ApiResponse::created(dog))
}

/// GET /dogs/:dog_id
pub async fn show(
    State(state): State<AppState>,
    Path(dog_id): Path<String>,
) -> ApiResult<Dog> {
    let dog = state.dogs.get(parse_dog_id(&dog_id)?).await?;
    Ok(ApiResponse::success(dog))
}

/// PUT /dogs/:dog_id - partial update, owner only
pub async fn update(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(dog_id): Path<String>,
    ValidatedJson(body): ValidatedJson<DogUpdate>,
) -> ApiResult<Dog> {
    let dog = state
        .dogs
        .update(&caller, parse_dog_id(&dog_id)?, body)
        .await?;
    Ok(ApiResponse::success(dog))
}

/// DELETE /dogs/:dog_id - owner only
pub async fn delete(
    State(state): State<AppState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(dog_id): Path<String>,
) -> ApiResult<Value> {
    state.dogs.delete(&caller, parse_dog_id(&dog_id)?).await?;
    Ok(ApiResponse::success(json!({ "message": "dog deleted" })))
}

fn parse_dog_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid dog id: {}", raw)))
}

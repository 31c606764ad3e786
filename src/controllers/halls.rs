use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{created, fetch, list_or_no_content, remove};
use crate::dto::{CreateHallRequest, UpdateHallRequest, HallConfirmation};
use crate::error::ApiError;
use crate::middleware::{ApiJson, AuthUser};
use crate::models::Hall;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/halls", get(list_halls).post(create_hall).put(update_hall))
        .route("/halls/{id}", get(get_hall).delete(delete_hall))
}

// GET /api/halls
async fn list_halls(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let halls = state.repos.halls.get_all().await?;
    Ok(list_or_no_content(halls))
}

// GET /api/halls/{id}
async fn get_hall(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Hall>, ApiError> {
    let hall: Hall = fetch(state.repos.halls.as_ref(), id, "Hall").await?;
    Ok(Json(hall))
}

// POST /api/halls (admin)
async fn create_hall(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<CreateHallRequest>,
) -> Result<Response, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let hall = state
        .repos
        .halls
        .create(Hall::from(req))
        .await
        .map_err(|e| ApiError::repo(e, "Create error"))?;

    info!("hall {} created", hall.id);
    Ok(created("halls", hall.id, HallConfirmation::from(&hall)))
}

// PUT /api/halls (admin)
async fn update_hall(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<UpdateHallRequest>,
) -> Result<Json<HallConfirmation>, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let hall = state
        .repos
        .halls
        .update(Hall::from(req))
        .await
        .map_err(|e| ApiError::repo(e, "Update error"))?
        .ok_or_else(|| ApiError::not_found("Hall"))?;
    Ok(Json(HallConfirmation::from(&hall)))
}

// DELETE /api/halls/{id} (admin); seats stay, detached from the hall
async fn delete_hall(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    remove::<Hall, _>(state.repos.halls.as_ref(), id, "Hall").await
}

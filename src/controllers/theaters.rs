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
use crate::dto::{CreateTheaterRequest, UpdateTheaterRequest, TheaterConfirmation};
use crate::error::ApiError;
use crate::middleware::{ApiJson, AuthUser};
use crate::models::Theater;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/theaters", get(list_theaters).post(create_theater).put(update_theater))
        .route("/theaters/{id}", get(get_theater).delete(delete_theater))
}

// GET /api/theaters
async fn list_theaters(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let theaters = state.repos.theaters.get_all().await?;
    Ok(list_or_no_content(theaters))
}

// GET /api/theaters/{id}
async fn get_theater(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Theater>, ApiError> {
    let theater: Theater = fetch(state.repos.theaters.as_ref(), id, "Theater").await?;
    Ok(Json(theater))
}

// POST /api/theaters (admin)
async fn create_theater(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<CreateTheaterRequest>,
) -> Result<Response, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let theater = state
        .repos
        .theaters
        .create(Theater::from(req))
        .await
        .map_err(|e| ApiError::repo(e, "Create error"))?;

    info!("theater {} created", theater.id);
    Ok(created("theaters", theater.id, TheaterConfirmation::from(&theater)))
}

// PUT /api/theaters (admin)
async fn update_theater(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<UpdateTheaterRequest>,
) -> Result<Json<TheaterConfirmation>, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let theater = state
        .repos
        .theaters
        .update(Theater::from(req))
        .await
        .map_err(|e| ApiError::repo(e, "Update error"))?
        .ok_or_else(|| ApiError::not_found("Theater"))?;
    Ok(Json(TheaterConfirmation::from(&theater)))
}

// DELETE /api/theaters/{id} (admin); halls and their performances go with it
async fn delete_theater(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    remove::<Theater, _>(state.repos.theaters.as_ref(), id, "Theater").await
}

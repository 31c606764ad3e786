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
use crate::dto::{CreatePerformanceRequest, UpdatePerformanceRequest, PerformanceConfirmation};
use crate::error::ApiError;
use crate::middleware::{ApiJson, AuthUser};
use crate::models::Performance;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/performances", get(list_performances).post(create_performance).put(update_performance))
        .route("/performances/{id}", get(get_performance).delete(delete_performance))
}

// GET /api/performances
async fn list_performances(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let performances = state.repos.performances.get_all().await?;
    Ok(list_or_no_content(performances))
}

// GET /api/performances/{id}
async fn get_performance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Performance>, ApiError> {
    let performance: Performance = fetch(state.repos.performances.as_ref(), id, "Performance").await?;
    Ok(Json(performance))
}

// POST /api/performances (admin)
async fn create_performance(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<CreatePerformanceRequest>,
) -> Result<Response, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let performance = state
        .repos
        .performances
        .create(Performance::from(req))
        .await
        .map_err(|e| ApiError::repo(e, "Create error"))?;

    info!("performance {} created", performance.id);
    Ok(created("performances", performance.id, PerformanceConfirmation::from(&performance)))
}

// PUT /api/performances (admin)
async fn update_performance(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<UpdatePerformanceRequest>,
) -> Result<Json<PerformanceConfirmation>, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let performance = state
        .repos
        .performances
        .update(Performance::from(req))
        .await
        .map_err(|e| ApiError::repo(e, "Update error"))?
        .ok_or_else(|| ApiError::not_found("Performance"))?;
    Ok(Json(PerformanceConfirmation::from(&performance)))
}

// DELETE /api/performances/{id} (admin); 409 while reservations reference it
async fn delete_performance(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    remove::<Performance, _>(state.repos.performances.as_ref(), id, "Performance").await
}

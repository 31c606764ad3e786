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
use crate::dto::{CreateShowRequest, UpdateShowRequest, ShowConfirmation};
use crate::error::ApiError;
use crate::middleware::{ApiJson, AuthUser};
use crate::models::Show;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shows", get(list_shows).post(create_show).put(update_show))
        .route("/shows/{id}", get(get_show).delete(delete_show))
}

// GET /api/shows, newest premiere first on Postgres
async fn list_shows(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let shows = state.repos.shows.get_all().await?;
    Ok(list_or_no_content(shows))
}

// GET /api/shows/{id}
async fn get_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Show>, ApiError> {
    let show: Show = fetch(state.repos.shows.as_ref(), id, "Show").await?;
    Ok(Json(show))
}

// POST /api/shows (admin)
async fn create_show(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<CreateShowRequest>,
) -> Result<Response, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let show = state
        .repos
        .shows
        .create(Show::from(req))
        .await
        .map_err(|e| ApiError::repo(e, "Create error"))?;

    info!("show {} created", show.id);
    Ok(created("shows", show.id, ShowConfirmation::from(&show)))
}

// PUT /api/shows (admin)
async fn update_show(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<UpdateShowRequest>,
) -> Result<Json<ShowConfirmation>, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let show = state
        .repos
        .shows
        .update(Show::from(req))
        .await
        .map_err(|e| ApiError::repo(e, "Update error"))?
        .ok_or_else(|| ApiError::not_found("Show"))?;
    Ok(Json(ShowConfirmation::from(&show)))
}

// DELETE /api/shows/{id} (admin)
async fn delete_show(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    remove::<Show, _>(state.repos.shows.as_ref(), id, "Show").await
}

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
use crate::dto::{CreateSeatRequest, UpdateSeatRequest, SeatConfirmation};
use crate::error::ApiError;
use crate::middleware::{ApiJson, AuthUser};
use crate::models::Seat;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats", get(list_seats).post(create_seat).put(update_seat))
        .route("/seats/{id}", get(get_seat).delete(delete_seat))
}

// GET /api/seats
async fn list_seats(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let seats = state.repos.seats.get_all().await?;
    Ok(list_or_no_content(seats))
}

// GET /api/seats/{id}
async fn get_seat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Seat>, ApiError> {
    Ok(Json(fetch::<Seat, _>(state.repos.seats.as_ref(), id, "Seat").await?))
}

// POST /api/seats (admin)
async fn create_seat(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<CreateSeatRequest>,
) -> Result<Response, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let seat = state
        .repos
        .seats
        .create(Seat::from(req))
        .await
        .map_err(|e| ApiError::repo(e, "Create error"))?;

    info!("seat {} created", seat.id);
    Ok(created("seats", seat.id, SeatConfirmation::from(&seat)))
}

// PUT /api/seats (admin)
async fn update_seat(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<UpdateSeatRequest>,
) -> Result<Json<SeatConfirmation>, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let seat = state
        .repos
        .seats
        .update(Seat::from(req))
        .await
        .map_err(|e| ApiError::repo(e, "Update error"))?
        .ok_or_else(|| ApiError::not_found("Seat"))?;
    Ok(Json(SeatConfirmation::from(&seat)))
}

// DELETE /api/seats/{id} (admin)
async fn delete_seat(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    remove::<Seat, _>(state.repos.seats.as_ref(), id, "Seat").await
}

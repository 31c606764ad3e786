use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{created, fetch, list_or_no_content, remove};
use crate::dto::{CreateReservationRequest, ReservationConfirmation, UpdateReservationRequest};
use crate::error::ApiError;
use crate::middleware::{ApiJson, AuthUser};
use crate::models::Reservation;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/reservations",
            get(list_reservations).post(create_reservation).put(update_reservation),
        )
        .route("/reservations/{id}", get(get_reservation).delete(delete_reservation))
}

fn check_expiry(created_at: NaiveDateTime, expires_at: NaiveDateTime) -> Result<(), ApiError> {
    if expires_at <= created_at {
        return Err(ApiError::BadRequest(
            "expires_at must be later than the reservation's creation time".to_string(),
        ));
    }
    Ok(())
}

// GET /api/reservations (admin)
async fn list_reservations(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> Result<Response, ApiError> {
    caller.require_admin()?;
    let reservations = state.repos.reservations.get_all().await?;
    Ok(list_or_no_content(reservations))
}

// GET /api/reservations/{id} (owner or admin)
async fn get_reservation(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation: Reservation = fetch(state.repos.reservations.as_ref(), id, "Reservation").await?;
    caller.require_self_or_admin(reservation.user_id)?;
    Ok(Json(reservation))
}

// POST /api/reservations
async fn create_reservation(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<CreateReservationRequest>,
) -> Result<Response, ApiError> {
    req.validate()?;
    let owner = req.user_id.unwrap_or(caller.user_id);
    caller.require_self_or_admin(owner)?;

    let now = Utc::now().naive_utc();
    check_expiry(now, req.expires_at)?;

    let reservation = state
        .repos
        .reservations
        .create(req.into_entity(owner, now))
        .await
        .map_err(|e| ApiError::repo(e, "Create error"))?;

    info!(
        "reservation {} for performance {} by user {}",
        reservation.id, reservation.performance_id, reservation.user_id
    );
    Ok(created("reservations", reservation.id, ReservationConfirmation::from(&reservation)))
}

// PUT /api/reservations (owner or admin)
async fn update_reservation(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<UpdateReservationRequest>,
) -> Result<Json<ReservationConfirmation>, ApiError> {
    req.validate()?;
    let current: Reservation = fetch(state.repos.reservations.as_ref(), req.id, "Reservation").await?;
    caller.require_self_or_admin(current.user_id)?;
    check_expiry(current.created_at, req.expires_at)?;

    let reservation = state
        .repos
        .reservations
        .update(req.apply(current))
        .await
        .map_err(|e| ApiError::repo(e, "Update error"))?
        .ok_or_else(|| ApiError::not_found("Reservation"))?;
    Ok(Json(ReservationConfirmation::from(&reservation)))
}

// DELETE /api/reservations/{id} (owner or admin)
async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let reservation: Reservation = fetch(state.repos.reservations.as_ref(), id, "Reservation").await?;
    caller.require_self_or_admin(reservation.user_id)?;
    remove::<Reservation, _>(state.repos.reservations.as_ref(), id, "Reservation").await
}

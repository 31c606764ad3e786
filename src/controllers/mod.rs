pub mod editors;
pub mod halls;
pub mod performances;
pub mod reservations;
pub mod seats;
pub mod shows;
pub mod theaters;
pub mod users;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::repositories::Repository;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(users::routes())
        .merge(editors::routes())
        .merge(theaters::routes())
        .merge(halls::routes())
        .merge(shows::routes())
        .merge(performances::routes())
        .merge(seats::routes())
        .merge(reservations::routes())
}

/* ---------- helpers ---------- */

/// 200 with the items, or 204 when there are none.
fn list_or_no_content<T: Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::OK, Json(items)).into_response()
    }
}

/// 201 with `Location: /api/<resource>/<id>`.
fn created<T: Serialize>(resource: &str, id: Uuid, body: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/{resource}/{id}"))],
        Json(body),
    )
        .into_response()
}

async fn fetch<E, R>(repo: &R, id: Uuid, what: &str) -> Result<E, ApiError>
where
    R: Repository<E> + ?Sized,
{
    repo.get_by_id(id).await?.ok_or_else(|| ApiError::not_found(what))
}

async fn remove<E, R>(repo: &R, id: Uuid, what: &str) -> Result<StatusCode, ApiError>
where
    R: Repository<E> + ?Sized,
{
    let removed = repo
        .delete(id)
        .await
        .map_err(|e| ApiError::repo(e, "Delete error"))?;
    if !removed {
        return Err(ApiError::not_found(what));
    }
    tracing::info!("{} {} deleted", what, id);
    Ok(StatusCode::NO_CONTENT)
}

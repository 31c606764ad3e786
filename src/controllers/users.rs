use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{created, fetch, list_or_no_content, remove};
use crate::dto::{CreateUserRequest, LoginRequest, LoginResponse, UpdateUserRequest, UserConfirmation, UserResponse};
use crate::error::ApiError;
use crate::middleware::{ApiJson, AuthUser};
use crate::models::User;
use crate::repositories::Repository;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user).put(update_user))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/users/username/{username}", get(get_user_by_username))
        .route("/users/login", post(login))
}

// GET /api/users (admin)
async fn list_users(State(state): State<Arc<AppState>>, caller: AuthUser) -> Result<Response, ApiError> {
    caller.require_admin()?;
    let users = state.repos.users.get_all().await?;
    Ok(list_or_no_content(users.into_iter().map(UserResponse::from).collect()))
}

// GET /api/users/{id}
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user: User = fetch(state.repos.users.as_ref(), id, "User").await?;
    Ok(Json(user.into()))
}

// GET /api/users/username/{username}
async fn get_user_by_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .repos
        .users
        .get_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(user.into()))
}

// POST /api/users (registration, public)
async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<Response, ApiError> {
    req.validate()?;
    let hash = state.auth.hash_password(&req.password).await?;
    let user = state
        .repos
        .users
        .create(req.into_entity(hash))
        .await
        .map_err(|e| ApiError::repo(e, "Create error"))?;

    info!("user {} registered as {}", user.username, user.id);
    Ok(created("users", user.id, UserConfirmation::from(&user)))
}

// PUT /api/users (self or admin)
async fn update_user(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserConfirmation>, ApiError> {
    req.validate()?;
    caller.require_self_or_admin(req.id)?;

    let current: User = fetch(state.repos.users.as_ref(), req.id, "User").await?;
    if req.wants_role_change(&current) {
        caller.require_admin()?;
    }

    let hash = match req.password.as_deref() {
        Some(password) => Some(state.auth.hash_password(password).await?),
        None => None,
    };
    let user = state
        .repos
        .users
        .update(req.apply(current, hash, caller.is_admin()))
        .await
        .map_err(|e| ApiError::repo(e, "Update error"))?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(UserConfirmation::from(&user)))
}

// DELETE /api/users/{id} (admin)
async fn delete_user(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    remove::<User, _>(state.repos.users.as_ref(), id, "User").await
}

// POST /api/users/login
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()?;
    let token = state
        .auth
        .authenticate(state.repos.users.as_ref(), &req.username, &req.password)
        .await?;
    Ok((StatusCode::OK, Json(LoginResponse { token })))
}

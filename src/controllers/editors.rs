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
use crate::dto::{CreateEditorRequest, EditorConfirmation, EditorResponse, UpdateEditorRequest};
use crate::error::ApiError;
use crate::middleware::{ApiJson, AuthUser};
use crate::models::Editor;
use crate::AppState;

// Editor accounts are managed by admins only.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/editors", get(list_editors).post(create_editor).put(update_editor))
        .route("/editors/{id}", get(get_editor).delete(delete_editor))
}

async fn list_editors(State(state): State<Arc<AppState>>, caller: AuthUser) -> Result<Response, ApiError> {
    caller.require_admin()?;
    let editors = state.repos.editors.get_all().await?;
    Ok(list_or_no_content(editors.into_iter().map(EditorResponse::from).collect()))
}

async fn get_editor(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EditorResponse>, ApiError> {
    caller.require_admin()?;
    let editor: Editor = fetch(state.repos.editors.as_ref(), id, "Editor").await?;
    Ok(Json(editor.into()))
}

async fn create_editor(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<CreateEditorRequest>,
) -> Result<Response, ApiError> {
    caller.require_admin()?;
    req.validate()?;
    let hash = state.auth.hash_password(&req.password).await?;
    let editor = state
        .repos
        .editors
        .create(req.into_entity(hash))
        .await
        .map_err(|e| ApiError::repo(e, "Create error"))?;

    info!("editor {} created", editor.id);
    Ok(created("editors", editor.id, EditorConfirmation::from(&editor)))
}

async fn update_editor(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(req): ApiJson<UpdateEditorRequest>,
) -> Result<Json<EditorConfirmation>, ApiError> {
    caller.require_admin()?;
    req.validate()?;

    let current: Editor = fetch(state.repos.editors.as_ref(), req.id, "Editor").await?;
    let hash = match req.password.as_deref() {
        Some(password) => Some(state.auth.hash_password(password).await?),
        None => None,
    };
    let editor = state
        .repos
        .editors
        .update(req.apply(current, hash))
        .await
        .map_err(|e| ApiError::repo(e, "Update error"))?
        .ok_or_else(|| ApiError::not_found("Editor"))?;
    Ok(Json(EditorConfirmation::from(&editor)))
}

// theaters of a deleted editor keep existing with editor_id = NULL
async fn delete_editor(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    caller.require_admin()?;
    remove::<Editor, _>(state.repos.editors.as_ref(), id, "Editor").await
}

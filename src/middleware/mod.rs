use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;
use uuid::Uuid;

mod json;

pub use json::ApiJson;

use crate::error::ApiError;
use crate::models::user::ROLE_ADMIN;
use crate::repositories::Repository;

/// Caller identity taken from a verified bearer token. The role is read
/// from the stored user, so demotions and deletions apply immediately.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin role required".to_string()))
        }
    }

    /// Passes for the owner of a record or for an admin.
    pub fn require_self_or_admin(&self, owner: Uuid) -> Result<(), ApiError> {
        if self.user_id == owner || self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Not allowed to access this record".to_string()))
        }
    }
}

// Bearer token extractor
impl FromRequestParts<Arc<crate::AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Expected a Bearer token".to_string()))?;

        let claims = state.auth.decode_token(token.trim())?;

        let user = state
            .repos
            .users
            .get_by_id(claims.sub)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Token user no longer exists".to_string()))?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn caller(role: &str) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            username: "ana77".to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn admin_passes_every_check() {
        let admin = caller("admin");
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_self_or_admin(Uuid::new_v4()).is_ok());
    }

    #[test]
    fn user_only_reaches_own_records() {
        let user = caller("user");
        assert_eq!(user.require_admin().unwrap_err().status(), StatusCode::FORBIDDEN);
        assert!(user.require_self_or_admin(user.user_id).is_ok());
        assert!(user.require_self_or_admin(Uuid::new_v4()).is_err());
    }
}

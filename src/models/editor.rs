use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Staff account that may be attached to a theater.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Editor {
    pub id: Uuid,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub national_id: Option<String>,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

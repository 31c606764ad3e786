use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Theater {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub address: Option<String>,
    // Nulled when the editor is deleted
    pub editor_id: Option<Uuid>,
}

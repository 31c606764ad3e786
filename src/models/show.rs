use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Show {
    pub id: Uuid,
    pub title: String,
    pub genre: Option<String>,
    pub premiere_date: NaiveDateTime,
    pub performance_count: i32,
}

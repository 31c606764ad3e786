use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single scheduled staging of a show in a hall.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Performance {
    pub id: Uuid,
    pub starts_at: NaiveDateTime,
    pub price: i32,
    pub free_seats: i32,
    pub guest_show: bool,
    pub show_id: Uuid,
    pub hall_id: Uuid,
}

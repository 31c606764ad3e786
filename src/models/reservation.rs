use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub seat_count: i32,
    pub total_price: i32,
    pub paid: bool,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub performance_id: Uuid,
    pub user_id: Uuid,
}

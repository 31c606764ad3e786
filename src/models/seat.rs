use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub id: Uuid,
    pub row_number: i32,
    pub seat_number: i32,
    pub sector: Option<String>,
    pub hall_id: Option<Uuid>,
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Reservation;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    #[validate(range(min = 1))]
    pub seat_count: i32,
    #[validate(range(min = 0))]
    pub total_price: i32,
    #[serde(default)]
    pub paid: bool,
    pub expires_at: NaiveDateTime,
    pub performance_id: Uuid,
    /// Admins may book on behalf of another user; everyone else books for themselves.
    pub user_id: Option<Uuid>,
}

impl CreateReservationRequest {
    pub fn into_entity(self, user_id: Uuid, created_at: NaiveDateTime) -> Reservation {
        Reservation {
            id: Uuid::nil(),
            seat_count: self.seat_count,
            total_price: self.total_price,
            paid: self.paid,
            created_at,
            expires_at: self.expires_at,
            performance_id: self.performance_id,
            user_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReservationRequest {
    pub id: Uuid,
    #[validate(range(min = 1))]
    pub seat_count: i32,
    #[validate(range(min = 0))]
    pub total_price: i32,
    pub paid: bool,
    pub expires_at: NaiveDateTime,
    pub performance_id: Uuid,
}

impl UpdateReservationRequest {
    /// Owner and creation time are fixed once the reservation exists.
    pub fn apply(self, current: Reservation) -> Reservation {
        Reservation {
            id: current.id,
            seat_count: self.seat_count,
            total_price: self.total_price,
            paid: self.paid,
            created_at: current.created_at,
            expires_at: self.expires_at,
            performance_id: self.performance_id,
            user_id: current.user_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ReservationConfirmation {
    pub id: Uuid,
    pub seat_count: i32,
    pub total_price: i32,
    pub expires_at: NaiveDateTime,
}

impl From<&Reservation> for ReservationConfirmation {
    fn from(r: &Reservation) -> Self {
        Self { id: r.id, seat_count: r.seat_count, total_price: r.total_price, expires_at: r.expires_at }
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Seat;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSeatRequest {
    #[validate(range(min = 1))]
    pub row_number: i32,
    #[validate(range(min = 1))]
    pub seat_number: i32,
    pub sector: Option<String>,
    pub hall_id: Option<Uuid>,
}

impl From<CreateSeatRequest> for Seat {
    fn from(req: CreateSeatRequest) -> Self {
        Seat {
            id: Uuid::nil(),
            row_number: req.row_number,
            seat_number: req.seat_number,
            sector: req.sector,
            hall_id: req.hall_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSeatRequest {
    pub id: Uuid,
    #[validate(range(min = 1))]
    pub row_number: i32,
    #[validate(range(min = 1))]
    pub seat_number: i32,
    pub sector: Option<String>,
    pub hall_id: Option<Uuid>,
}

impl From<UpdateSeatRequest> for Seat {
    fn from(req: UpdateSeatRequest) -> Self {
        Seat {
            id: req.id,
            row_number: req.row_number,
            seat_number: req.seat_number,
            sector: req.sector,
            hall_id: req.hall_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SeatConfirmation {
    pub id: Uuid,
    pub row_number: i32,
    pub seat_number: i32,
}

impl From<&Seat> for SeatConfirmation {
    fn from(seat: &Seat) -> Self {
        Self { id: seat.id, row_number: seat.row_number, seat_number: seat.seat_number }
    }
}

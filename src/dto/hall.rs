use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Hall;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHallRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0))]
    pub total_seats: i32,
    pub theater_id: Uuid,
}

impl From<CreateHallRequest> for Hall {
    fn from(req: CreateHallRequest) -> Self {
        Hall { id: Uuid::nil(), name: req.name, total_seats: req.total_seats, theater_id: req.theater_id }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateHallRequest {
    pub id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0))]
    pub total_seats: i32,
    pub theater_id: Uuid,
}

impl From<UpdateHallRequest> for Hall {
    fn from(req: UpdateHallRequest) -> Self {
        Hall { id: req.id, name: req.name, total_seats: req.total_seats, theater_id: req.theater_id }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HallConfirmation {
    pub id: Uuid,
    pub name: String,
    pub theater_id: Uuid,
}

impl From<&Hall> for HallConfirmation {
    fn from(hall: &Hall) -> Self {
        Self { id: hall.id, name: hall.name.clone(), theater_id: hall.theater_id }
    }
}

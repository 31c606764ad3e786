use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Performance;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePerformanceRequest {
    pub starts_at: NaiveDateTime,
    #[validate(range(min = 0))]
    pub price: i32,
    #[validate(range(min = 0))]
    pub free_seats: i32,
    #[serde(default)]
    pub guest_show: bool,
    pub show_id: Uuid,
    pub hall_id: Uuid,
}

impl From<CreatePerformanceRequest> for Performance {
    fn from(req: CreatePerformanceRequest) -> Self {
        Performance {
            id: Uuid::nil(),
            starts_at: req.starts_at,
            price: req.price,
            free_seats: req.free_seats,
            guest_show: req.guest_show,
            show_id: req.show_id,
            hall_id: req.hall_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePerformanceRequest {
    pub id: Uuid,
    pub starts_at: NaiveDateTime,
    #[validate(range(min = 0))]
    pub price: i32,
    #[validate(range(min = 0))]
    pub free_seats: i32,
    pub guest_show: bool,
    pub show_id: Uuid,
    pub hall_id: Uuid,
}

impl From<UpdatePerformanceRequest> for Performance {
    fn from(req: UpdatePerformanceRequest) -> Self {
        Performance {
            id: req.id,
            starts_at: req.starts_at,
            price: req.price,
            free_seats: req.free_seats,
            guest_show: req.guest_show,
            show_id: req.show_id,
            hall_id: req.hall_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PerformanceConfirmation {
    pub id: Uuid,
    pub starts_at: NaiveDateTime,
    pub show_id: Uuid,
    pub hall_id: Uuid,
}

impl From<&Performance> for PerformanceConfirmation {
    fn from(p: &Performance) -> Self {
        Self { id: p.id, starts_at: p.starts_at, show_id: p.show_id, hall_id: p.hall_id }
    }
}

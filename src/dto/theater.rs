use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Theater;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTheaterRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub city: String,
    pub address: Option<String>,
    pub editor_id: Option<Uuid>,
}

impl From<CreateTheaterRequest> for Theater {
    fn from(req: CreateTheaterRequest) -> Self {
        Theater {
            id: Uuid::nil(),
            name: req.name,
            city: req.city,
            address: req.address,
            editor_id: req.editor_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTheaterRequest {
    pub id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub city: String,
    pub address: Option<String>,
    pub editor_id: Option<Uuid>,
}

impl From<UpdateTheaterRequest> for Theater {
    fn from(req: UpdateTheaterRequest) -> Self {
        Theater {
            id: req.id,
            name: req.name,
            city: req.city,
            address: req.address,
            editor_id: req.editor_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TheaterConfirmation {
    pub id: Uuid,
    pub name: String,
    pub city: String,
}

impl From<&Theater> for TheaterConfirmation {
    fn from(theater: &Theater) -> Self {
        Self { id: theater.id, name: theater.name.clone(), city: theater.city.clone() }
    }
}

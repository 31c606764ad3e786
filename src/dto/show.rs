use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Show;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateShowRequest {
    #[validate(length(min = 1))]
    pub title: String,
    pub genre: Option<String>,
    pub premiere_date: NaiveDateTime,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub performance_count: i32,
}

impl From<CreateShowRequest> for Show {
    fn from(req: CreateShowRequest) -> Self {
        Show {
            id: Uuid::nil(),
            title: req.title,
            genre: req.genre,
            premiere_date: req.premiere_date,
            performance_count: req.performance_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateShowRequest {
    pub id: Uuid,
    #[validate(length(min = 1))]
    pub title: String,
    pub genre: Option<String>,
    pub premiere_date: NaiveDateTime,
    #[validate(range(min = 0))]
    pub performance_count: i32,
}

impl From<UpdateShowRequest> for Show {
    fn from(req: UpdateShowRequest) -> Self {
        Show {
            id: req.id,
            title: req.title,
            genre: req.genre,
            premiere_date: req.premiere_date,
            performance_count: req.performance_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ShowConfirmation {
    pub id: Uuid,
    pub title: String,
    pub premiere_date: NaiveDateTime,
}

impl From<&Show> for ShowConfirmation {
    fn from(show: &Show) -> Self {
        Self { id: show.id, title: show.title.clone(), premiere_date: show.premiere_date }
    }
}

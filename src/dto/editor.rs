use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Editor;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEditorRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    #[validate(length(min = 1, max = 13))]
    pub national_id: Option<String>,
    #[validate(length(min = 1))]
    pub username: Option<String>,
    #[validate(length(min = 1))]
    pub password: String,
}

impl CreateEditorRequest {
    pub fn into_entity(self, password_hash: String) -> Editor {
        Editor {
            id: Uuid::nil(),
            name: self.name,
            surname: self.surname,
            national_id: self.national_id,
            username: self.username,
            password_hash,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEditorRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub surname: Option<String>,
    #[validate(length(min = 1, max = 13))]
    pub national_id: Option<String>,
    #[validate(length(min = 1))]
    pub username: Option<String>,
    #[validate(length(min = 1))]
    pub password: Option<String>,
}

impl UpdateEditorRequest {
    pub fn apply(self, current: Editor, password_hash: Option<String>) -> Editor {
        Editor {
            id: current.id,
            name: self.name,
            surname: self.surname,
            national_id: self.national_id,
            username: self.username,
            password_hash: password_hash.unwrap_or(current.password_hash),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EditorConfirmation {
    pub id: Uuid,
    pub username: Option<String>,
}

impl From<&Editor> for EditorConfirmation {
    fn from(editor: &Editor) -> Self {
        Self { id: editor.id, username: editor.username.clone() }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EditorResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub national_id: Option<String>,
    pub username: Option<String>,
}

impl From<Editor> for EditorResponse {
    fn from(editor: Editor) -> Self {
        Self {
            id: editor.id,
            name: editor.name,
            surname: editor.surname,
            national_id: editor.national_id,
            username: editor.username,
        }
    }
}

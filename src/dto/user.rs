use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{User, ROLE_ADMIN, ROLE_USER};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub surname: String,
    #[validate(length(min = 1, max = 11, message = "phone must be 1-11 characters"))]
    pub phone: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

impl CreateUserRequest {
    /// New accounts always start as plain users.
    pub fn into_entity(self, password_hash: String) -> User {
        User {
            id: Uuid::nil(),
            username: self.username,
            name: self.name,
            surname: self.surname,
            phone: self.phone,
            password_hash,
            role: ROLE_USER.to_string(),
            reservation_count: 0,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub id: Uuid,
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub surname: String,
    #[validate(length(min = 1, max = 11, message = "phone must be 1-11 characters"))]
    pub phone: String,
    /// Keeps the current password when absent.
    #[validate(length(min = 1))]
    pub password: Option<String>,
    /// Only admins may change roles.
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
    /// Ignored unless the caller is an admin.
    #[validate(range(min = 0))]
    pub reservation_count: Option<i32>,
}

fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    match role {
        ROLE_ADMIN | ROLE_USER => Ok(()),
        _ => Err(validator::ValidationError::new("unknown_role")),
    }
}

impl UpdateUserRequest {
    pub fn wants_role_change(&self, current: &User) -> bool {
        self.role.as_deref().is_some_and(|role| role != current.role)
    }

    /// Applies the request on top of the stored row.
    pub fn apply(self, current: User, password_hash: Option<String>, by_admin: bool) -> User {
        let reservation_count = match self.reservation_count {
            Some(count) if by_admin => count,
            _ => current.reservation_count,
        };
        User {
            id: current.id,
            username: self.username,
            name: self.name,
            surname: self.surname,
            phone: self.phone,
            password_hash: password_hash.unwrap_or(current.password_hash),
            role: self.role.unwrap_or(current.role),
            reservation_count,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserConfirmation {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub surname: String,
}

impl From<&User> for UserConfirmation {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            surname: user.surname.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub role: String,
    pub reservation_count: i32,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            surname: user.surname,
            phone: user.phone,
            role: user.role,
            reservation_count: user.reservation_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(phone: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: "ana77".to_string(),
            name: "Ana".to_string(),
            surname: "Ilic".to_string(),
            phone: phone.to_string(),
            password: "pw1".to_string(),
        }
    }

    #[test]
    fn phone_longer_than_eleven_chars_is_invalid() {
        assert!(create_request("06412345678").validate().is_ok());
        assert!(create_request("064123456789").validate().is_err());
    }

    #[test]
    fn registration_never_grants_admin() {
        let user = create_request("0641234567").into_entity("hash".to_string());
        assert_eq!(user.role, ROLE_USER);
        assert_eq!(user.password_hash, "hash");
    }

    #[test]
    fn update_keeps_password_and_role_when_absent() {
        let current = create_request("0641234567").into_entity("old-hash".to_string());
        let request = UpdateUserRequest {
            id: current.id,
            username: "ana78".to_string(),
            name: "Ana".to_string(),
            surname: "Ilic".to_string(),
            phone: "0641234567".to_string(),
            password: None,
            role: None,
            reservation_count: None,
        };
        assert!(!request.wants_role_change(&current));
        let updated = request.apply(current, None, false);
        assert_eq!(updated.username, "ana78");
        assert_eq!(updated.password_hash, "old-hash");
        assert_eq!(updated.role, ROLE_USER);
    }

    #[test]
    fn only_admin_sets_reservation_count() {
        let current = create_request("0641234567").into_entity("hash".to_string());
        let request = |count| UpdateUserRequest {
            id: current.id,
            username: "ana77".to_string(),
            name: "Ana".to_string(),
            surname: "Ilic".to_string(),
            phone: "0641234567".to_string(),
            password: None,
            role: None,
            reservation_count: Some(count),
        };
        assert_eq!(request(40).apply(current.clone(), None, false).reservation_count, 0);
        assert_eq!(request(3).apply(current.clone(), None, true).reservation_count, 3);
    }

    #[test]
    fn unknown_role_is_invalid() {
        let request = UpdateUserRequest {
            id: Uuid::new_v4(),
            username: "ana77".to_string(),
            name: "Ana".to_string(),
            surname: "Ilic".to_string(),
            phone: "0641234567".to_string(),
            password: None,
            role: Some("owner".to_string()),
            reservation_count: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn read_shape_has_no_password() {
        let user = create_request("0641234567").into_entity("hash".to_string());
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "ana77");
    }
}

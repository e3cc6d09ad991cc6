use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::modules::user::schema::{Status, UserEntity};
use crate::utils::double_option;

/// Static segments under `/users` that a `/users/{username}` lookup could never reach.
const RESERVED_USERNAMES: [&str; 2] = ["profile", "all"];

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if RESERVED_USERNAMES.iter().any(|r| r.eq_ignore_ascii_case(username)) {
        let mut err = ValidationError::new("reserved_username");
        err.message = Some(format!("Username {username} is reserved").into());
        return Err(err);
    }
    Ok(())
}

#[derive(Deserialize, Validate)]
pub struct SignUpModel {
    #[validate(
        length(min = 3, message = "Username must be at least 3 characters long"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: String,
}

#[derive(Deserialize, Validate)]
pub struct SignInModel {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct UpdateUserModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<Option<String>>,
}

impl UpdateUserModel {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
    }
}

pub struct InsertUser {
    pub username: String,
    pub email: String,
    pub hash_password: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<Option<String>>,
}

impl From<UpdateUserModel> for UpdateUser {
    fn from(model: UpdateUserModel) -> Self {
        UpdateUser {
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            bio: model.bio,
        }
    }
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub id: uuid::Uuid,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: uuid::Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub status: Status,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            display_name: entity.display_name(),
            id: entity.id,
            username: entity.username,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            bio: entity.bio,
            status: entity.status,
        }
    }
}

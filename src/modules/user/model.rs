use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::user::schema::UserEntity;

#[derive(Deserialize, Validate)]
pub struct SignUpModel {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Deserialize, Validate)]
pub struct NicknameUpdateModel {
    #[validate(length(min = 1, message = "Nickname cannot be empty"))]
    pub nickname: String,
}

#[derive(Deserialize, Validate)]
pub struct UsernameQuery {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: String,
}

#[derive(Deserialize, Validate)]
pub struct UserEmailQuery {
    #[serde(rename = "userEmail")]
    #[validate(length(min = 1, message = "User email cannot be empty"))]
    pub user_email: String,
}

pub struct InsertUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub nickname: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            nickname: entity.nickname,
            created_at: entity.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct UsernameCheckResponse {
    pub available: bool,
}

#[derive(Serialize)]
pub struct UserEmailCheckResponse {
    pub exists: bool,
}

use log::info;
use std::sync::Arc;

use crate::api::error;

use crate::modules::user::model::{SignUpModel, UserResponse};
use crate::modules::user::{model::InsertUser, repository::UserRepository};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    pub fn with_dependencies(repo: Arc<dyn UserRepository + Send + Sync>) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo }
    }

    /// Registers the authenticated caller. Identity is already established
    /// by the token, so `id` comes from its subject, never from the body.
    pub async fn sign_up(
        &self,
        id: String,
        user: SignUpModel,
    ) -> Result<UserResponse, error::SystemError> {
        let new_user = InsertUser { id, username: user.username, email: user.email };

        let created = self.repo.create(&new_user).await?;
        info!("User {} signed up as {}", created.id, created.username);
        Ok(UserResponse::from(created))
    }

    pub async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<UserResponse, error::SystemError> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        Ok(UserResponse::from(user))
    }

    pub async fn username_available(&self, username: &str) -> Result<bool, error::SystemError> {
        let taken = self.repo.username_exists(username).await?;
        Ok(!taken)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, error::SystemError> {
        self.repo.email_exists(email).await
    }

    /// Only the owner of a profile may change its nickname.
    pub async fn update_nickname(
        &self,
        caller_id: &str,
        username: &str,
        nickname: &str,
    ) -> Result<UserResponse, error::SystemError> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        if user.id != caller_id {
            return Err(error::SystemError::forbidden("Cannot update another user's nickname"));
        }

        let updated = self
            .repo
            .update_nickname(username, nickname)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        Ok(UserResponse::from(updated))
    }
}

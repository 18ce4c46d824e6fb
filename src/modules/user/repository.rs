use crate::{
    api::error, modules::user::model::InsertUser, modules::user::schema::UserEntity,
};

#[async_trait::async_trait]
pub trait UserRepository {
    /// Username lookups are case-insensitive.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError>;
    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;
    async fn username_exists(&self, username: &str) -> Result<bool, error::SystemError>;
    async fn email_exists(&self, email: &str) -> Result<bool, error::SystemError>;
    async fn update_nickname(
        &self,
        username: &str,
        nickname: &str,
    ) -> Result<Option<UserEntity>, error::SystemError>;
}

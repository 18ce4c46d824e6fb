use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: String,
    pub username: String,
    pub email: String,
    pub nickname: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

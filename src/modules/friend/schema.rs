use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};

#[derive(Debug, PartialEq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "friend_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Accepted,
}

/// One row per relation. A pending row is a request from `sender_id` to
/// `recipient_id`; an accepted row is a friendship. Direction is kept so
/// that request lists can tell who initiated.
#[allow(unused)]
#[derive(Debug, Clone, FromRow)]
pub struct FriendEntity {
    pub sender_id: String,
    pub recipient_id: String,
    pub status: FriendStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

use crate::{
    api::error,
    modules::friend::{
        repository::FriendRepository,
        schema::{FriendEntity, FriendStatus},
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryPg {
    async fn find_between(
        &self,
        user_id_a: &str,
        user_id_b: &str,
    ) -> Result<Option<FriendEntity>, error::SystemError> {
        let relation = sqlx::query_as::<_, FriendEntity>(
            r#"
            SELECT *
            FROM friends
            WHERE
                (sender_id = $1 AND recipient_id = $2)
            OR (sender_id = $2 AND recipient_id = $1)
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(relation)
    }

    async fn create_request(
        &self,
        sender_id: &str,
        recipient_id: &str,
    ) -> Result<bool, error::SystemError> {
        let result = sqlx::query(
            r#"
            INSERT INTO friends (sender_id, recipient_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(sender_id)
        .bind(recipient_id)
        .bind(FriendStatus::Pending)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn resolve_request(
        &self,
        sender_id: &str,
        recipient_id: &str,
        accept: bool,
    ) -> Result<bool, error::SystemError> {
        // Both arms touch only the pending row addressed by the exact
        // direction, so resolving can never clobber an accepted friendship.
        let result = if accept {
            sqlx::query(
                r#"
                UPDATE friends
                SET status = $3, updated_at = now()
                WHERE sender_id = $1 AND recipient_id = $2 AND status = $4
                "#,
            )
            .bind(sender_id)
            .bind(recipient_id)
            .bind(FriendStatus::Accepted)
            .bind(FriendStatus::Pending)
            .execute(&self.pool)
            .await?
        } else {
            sqlx::query(
                "DELETE FROM friends WHERE sender_id = $1 AND recipient_id = $2 AND status = $3",
            )
            .bind(sender_id)
            .bind(recipient_id)
            .bind(FriendStatus::Pending)
            .execute(&self.pool)
            .await?
        };

        Ok(result.rows_affected() > 0)
    }

    async fn delete_between(
        &self,
        user_id_a: &str,
        user_id_b: &str,
    ) -> Result<bool, error::SystemError> {
        let result = sqlx::query(
            r#"
            DELETE FROM friends
            WHERE
                (sender_id = $1 AND recipient_id = $2)
            OR (sender_id = $2 AND recipient_id = $1)
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn friend_usernames(&self, user_id: &str) -> Result<Vec<String>, error::SystemError> {
        let usernames = sqlx::query_scalar::<_, String>(
            r#"
            SELECT u.username
            FROM friends f
            JOIN users u
                ON u.id = CASE
                    WHEN f.sender_id = $1 THEN f.recipient_id
                    ELSE f.sender_id
                END
            WHERE (f.sender_id = $1 OR f.recipient_id = $1)
              AND f.status = $2
            ORDER BY u.username
            "#,
        )
        .bind(user_id)
        .bind(FriendStatus::Accepted)
        .fetch_all(&self.pool)
        .await?;

        Ok(usernames)
    }

    async fn pending_sent_usernames(
        &self,
        user_id: &str,
    ) -> Result<Vec<String>, error::SystemError> {
        let usernames = sqlx::query_scalar::<_, String>(
            r#"
            SELECT u.username
            FROM friends f
            JOIN users u ON u.id = f.recipient_id
            WHERE f.sender_id = $1 AND f.status = $2
            ORDER BY f.created_at
            "#,
        )
        .bind(user_id)
        .bind(FriendStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(usernames)
    }

    async fn pending_received_usernames(
        &self,
        user_id: &str,
    ) -> Result<Vec<String>, error::SystemError> {
        let usernames = sqlx::query_scalar::<_, String>(
            r#"
            SELECT u.username
            FROM friends f
            JOIN users u ON u.id = f.sender_id
            WHERE f.recipient_id = $1 AND f.status = $2
            ORDER BY f.created_at
            "#,
        )
        .bind(user_id)
        .bind(FriendStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(usernames)
    }
}

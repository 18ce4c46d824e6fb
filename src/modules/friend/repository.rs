use crate::api::error;
use crate::modules::friend::schema::FriendEntity;

#[async_trait::async_trait]
pub trait FriendRepository {
    /// The live relation between two users, whichever side initiated it.
    async fn find_between(
        &self,
        user_id_a: &str,
        user_id_b: &str,
    ) -> Result<Option<FriendEntity>, error::SystemError>;

    /// Inserts a pending request. The unique pair index is the arbiter:
    /// returns false when a relation already claimed the pair, so a lost
    /// race never surfaces as an error.
    async fn create_request(
        &self,
        sender_id: &str,
        recipient_id: &str,
    ) -> Result<bool, error::SystemError>;

    /// Accepts (true) or rejects (false) the pending request sender -> recipient.
    /// Returns whether a pending row was actually affected.
    async fn resolve_request(
        &self,
        sender_id: &str,
        recipient_id: &str,
        accept: bool,
    ) -> Result<bool, error::SystemError>;

    /// Drops the relation between two users regardless of direction or
    /// status. Covers unfriending and cancelling an own pending request.
    async fn delete_between(
        &self,
        user_id_a: &str,
        user_id_b: &str,
    ) -> Result<bool, error::SystemError>;

    async fn friend_usernames(&self, user_id: &str) -> Result<Vec<String>, error::SystemError>;

    async fn pending_sent_usernames(
        &self,
        user_id: &str,
    ) -> Result<Vec<String>, error::SystemError>;

    async fn pending_received_usernames(
        &self,
        user_id: &str,
    ) -> Result<Vec<String>, error::SystemError>;
}

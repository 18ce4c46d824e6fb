use log::info;
use std::sync::Arc;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{FriendListResponse, FriendRequestListResponse, SendFriendRequestResponse},
            repository::FriendRepository,
            schema::{FriendEntity, FriendStatus},
        },
        user::repository::UserRepository,
    },
};

/// What a send attempt amounted to, before encoding for the client.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SendOutcome {
    Sent,
    AlreadyRequested,
    AlreadyFriends,
    UnknownRecipient,
}

impl SendOutcome {
    /// The client reads the outcome from two flags:
    ///   sent            -> (true,  false)
    ///   pending twin    -> (false, true)
    ///   already friends -> (true,  true)
    ///   no such user    -> (false, false)
    fn into_response(self) -> SendFriendRequestResponse {
        let (sent, already_exist) = match self {
            SendOutcome::Sent => (true, false),
            SendOutcome::AlreadyRequested => (false, true),
            SendOutcome::AlreadyFriends => (true, true),
            SendOutcome::UnknownRecipient => (false, false),
        };
        SendFriendRequestResponse {
            friend_request_sent: sent,
            friend_request_already_exist: already_exist,
        }
    }
}

fn classify_existing(relation: &FriendEntity) -> SendOutcome {
    match relation.status {
        FriendStatus::Accepted => SendOutcome::AlreadyFriends,
        FriendStatus::Pending => SendOutcome::AlreadyRequested,
    }
}

#[derive(Clone)]
pub struct FriendService<R, U>
where
    R: FriendRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    friend_repo: Arc<R>,
    user_repo: Arc<U>,
}

impl<R, U> FriendService<R, U>
where
    R: FriendRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(friend_repo: Arc<R>, user_repo: Arc<U>) -> Self {
        FriendService { friend_repo, user_repo }
    }

    /// Sending never fails over the state of the pair; every case is encoded
    /// in the response flags. The insert is the arbiter for races: two
    /// concurrent first requests resolve into one Sent and one
    /// AlreadyRequested.
    pub async fn send_friend_request(
        &self,
        sender_id: &str,
        recipient_username: &str,
    ) -> Result<SendFriendRequestResponse, error::SystemError> {
        let Some(recipient) = self.user_repo.find_by_username(recipient_username).await? else {
            return Ok(SendOutcome::UnknownRecipient.into_response());
        };

        // A self request is reported the same way as an unknown target.
        if recipient.id == sender_id {
            return Ok(SendOutcome::UnknownRecipient.into_response());
        }

        if let Some(relation) = self.friend_repo.find_between(sender_id, &recipient.id).await? {
            return Ok(classify_existing(&relation).into_response());
        }

        let inserted = self.friend_repo.create_request(sender_id, &recipient.id).await?;
        let outcome = if inserted {
            SendOutcome::Sent
        } else {
            info!(
                "Request {} -> {} lost the insert race, kept existing row",
                sender_id, recipient.id
            );
            SendOutcome::AlreadyRequested
        };
        Ok(outcome.into_response())
    }

    /// Resolves the pending request that `sender_username` sent to the
    /// caller. Returns false when there is nothing to resolve: unknown
    /// sender, no pending request, or a request pointing the other way.
    pub async fn resolve_friend_request(
        &self,
        recipient_id: &str,
        sender_username: &str,
        accept: bool,
    ) -> Result<bool, error::SystemError> {
        let Some(sender) = self.user_repo.find_by_username(sender_username).await? else {
            return Ok(false);
        };

        self.friend_repo.resolve_request(&sender.id, recipient_id, accept).await
    }

    /// Drops whatever relation exists with `other_username`, friendship or
    /// the caller's own pending request.
    pub async fn remove_friend(
        &self,
        caller_id: &str,
        other_username: &str,
    ) -> Result<bool, error::SystemError> {
        let Some(other) = self.user_repo.find_by_username(other_username).await? else {
            return Ok(false);
        };

        self.friend_repo.delete_between(caller_id, &other.id).await
    }

    pub async fn get_friend_list(
        &self,
        user_id: &str,
    ) -> Result<FriendListResponse, error::SystemError> {
        let friends = self.friend_repo.friend_usernames(user_id).await?;
        Ok(FriendListResponse { friends })
    }

    pub async fn get_friend_request_list(
        &self,
        user_id: &str,
    ) -> Result<FriendRequestListResponse, error::SystemError> {
        let (requests_sent, requests_received) = tokio::try_join!(
            self.friend_repo.pending_sent_usernames(user_id),
            self.friend_repo.pending_received_usernames(user_id),
        )?;

        Ok(FriendRequestListResponse { requests_sent, requests_received })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::{model::InsertUser, schema::UserEntity};
    use std::sync::Mutex;

    fn user(id: &str, username: &str) -> UserEntity {
        UserEntity {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            nickname: None,
            created_at: chrono::Utc::now(),
        }
    }

    struct FakeDirectory {
        users: Vec<UserEntity>,
    }

    #[async_trait::async_trait]
    impl UserRepository for FakeDirectory {
        async fn find_by_username(
            &self,
            username: &str,
        ) -> Result<Option<UserEntity>, error::SystemError> {
            Ok(self.users.iter().find(|u| u.username.eq_ignore_ascii_case(username)).cloned())
        }

        async fn create(&self, _user: &InsertUser) -> Result<UserEntity, error::SystemError> {
            unimplemented!("not used by friend service tests")
        }

        async fn username_exists(&self, username: &str) -> Result<bool, error::SystemError> {
            Ok(self.users.iter().any(|u| u.username.eq_ignore_ascii_case(username)))
        }

        async fn email_exists(&self, email: &str) -> Result<bool, error::SystemError> {
            Ok(self.users.iter().any(|u| u.email == email))
        }

        async fn update_nickname(
            &self,
            _username: &str,
            _nickname: &str,
        ) -> Result<Option<UserEntity>, error::SystemError> {
            unimplemented!("not used by friend service tests")
        }
    }

    /// In-memory stand-in for the friends table. Mirrors the unique pair
    /// index: one live row per pair, whichever direction.
    struct FakeRelations {
        users: Vec<UserEntity>,
        rows: Mutex<Vec<FriendEntity>>,
    }

    impl FakeRelations {
        fn username_of(&self, id: &str) -> String {
            self.users
                .iter()
                .find(|u| u.id == id)
                .map(|u| u.username.clone())
                .unwrap_or_else(|| id.to_string())
        }

        fn pair(row: &FriendEntity, a: &str, b: &str) -> bool {
            (row.sender_id == a && row.recipient_id == b)
                || (row.sender_id == b && row.recipient_id == a)
        }
    }

    #[async_trait::async_trait]
    impl FriendRepository for FakeRelations {
        async fn find_between(
            &self,
            a: &str,
            b: &str,
        ) -> Result<Option<FriendEntity>, error::SystemError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|r| Self::pair(r, a, b)).cloned())
        }

        async fn create_request(
            &self,
            sender_id: &str,
            recipient_id: &str,
        ) -> Result<bool, error::SystemError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|r| Self::pair(r, sender_id, recipient_id)) {
                return Ok(false);
            }
            let now = chrono::Utc::now();
            rows.push(FriendEntity {
                sender_id: sender_id.to_string(),
                recipient_id: recipient_id.to_string(),
                status: FriendStatus::Pending,
                created_at: now,
                updated_at: now,
            });
            Ok(true)
        }

        async fn resolve_request(
            &self,
            sender_id: &str,
            recipient_id: &str,
            accept: bool,
        ) -> Result<bool, error::SystemError> {
            let mut rows = self.rows.lock().unwrap();
            let position = rows.iter().position(|r| {
                r.sender_id == sender_id
                    && r.recipient_id == recipient_id
                    && r.status == FriendStatus::Pending
            });
            let Some(position) = position else {
                return Ok(false);
            };
            if accept {
                rows[position].status = FriendStatus::Accepted;
                rows[position].updated_at = chrono::Utc::now();
            } else {
                rows.remove(position);
            }
            Ok(true)
        }

        async fn delete_between(&self, a: &str, b: &str) -> Result<bool, error::SystemError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|r| !Self::pair(r, a, b));
            Ok(rows.len() < before)
        }

        async fn friend_usernames(&self, user_id: &str) -> Result<Vec<String>, error::SystemError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|r| r.status == FriendStatus::Accepted)
                .filter_map(|r| {
                    if r.sender_id == user_id {
                        Some(self.username_of(&r.recipient_id))
                    } else if r.recipient_id == user_id {
                        Some(self.username_of(&r.sender_id))
                    } else {
                        None
                    }
                })
                .collect())
        }

        async fn pending_sent_usernames(
            &self,
            user_id: &str,
        ) -> Result<Vec<String>, error::SystemError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|r| r.status == FriendStatus::Pending && r.sender_id == user_id)
                .map(|r| self.username_of(&r.recipient_id))
                .collect())
        }

        async fn pending_received_usernames(
            &self,
            user_id: &str,
        ) -> Result<Vec<String>, error::SystemError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|r| r.status == FriendStatus::Pending && r.recipient_id == user_id)
                .map(|r| self.username_of(&r.sender_id))
                .collect())
        }
    }

    /// Store where the pair gets claimed between the lookup and the
    /// insert, the way two concurrent first requests interleave.
    struct ContestedRelations;

    #[async_trait::async_trait]
    impl FriendRepository for ContestedRelations {
        async fn find_between(
            &self,
            _a: &str,
            _b: &str,
        ) -> Result<Option<FriendEntity>, error::SystemError> {
            Ok(None)
        }

        async fn create_request(
            &self,
            _sender_id: &str,
            _recipient_id: &str,
        ) -> Result<bool, error::SystemError> {
            Ok(false)
        }

        async fn resolve_request(
            &self,
            _sender_id: &str,
            _recipient_id: &str,
            _accept: bool,
        ) -> Result<bool, error::SystemError> {
            unimplemented!("not used by the race test")
        }

        async fn delete_between(&self, _a: &str, _b: &str) -> Result<bool, error::SystemError> {
            unimplemented!("not used by the race test")
        }

        async fn friend_usernames(
            &self,
            _user_id: &str,
        ) -> Result<Vec<String>, error::SystemError> {
            unimplemented!("not used by the race test")
        }

        async fn pending_sent_usernames(
            &self,
            _user_id: &str,
        ) -> Result<Vec<String>, error::SystemError> {
            unimplemented!("not used by the race test")
        }

        async fn pending_received_usernames(
            &self,
            _user_id: &str,
        ) -> Result<Vec<String>, error::SystemError> {
            unimplemented!("not used by the race test")
        }
    }

    fn service() -> FriendService<FakeRelations, FakeDirectory> {
        let users =
            vec![user("u-alice", "alice"), user("u-bob", "bob"), user("u-carol", "carol")];
        let relations = FakeRelations { users: users.clone(), rows: Mutex::new(Vec::new()) };
        let directory = FakeDirectory { users };
        FriendService::with_dependencies(Arc::new(relations), Arc::new(directory))
    }

    fn flags(response: &SendFriendRequestResponse) -> (bool, bool) {
        (response.friend_request_sent, response.friend_request_already_exist)
    }

    #[test]
    fn test_send_outcome_encoding() {
        assert_eq!(flags(&SendOutcome::Sent.into_response()), (true, false));
        assert_eq!(flags(&SendOutcome::AlreadyRequested.into_response()), (false, true));
        assert_eq!(flags(&SendOutcome::AlreadyFriends.into_response()), (true, true));
        assert_eq!(flags(&SendOutcome::UnknownRecipient.into_response()), (false, false));
    }

    #[tokio::test]
    async fn test_send_friend_request_creates_pending_request() {
        let service = service();

        let response = service.send_friend_request("u-alice", "bob").await.unwrap();
        assert_eq!(flags(&response), (true, false));

        let requests = service.get_friend_request_list("u-alice").await.unwrap();
        assert_eq!(requests.requests_sent, vec!["bob"]);
        assert!(requests.requests_received.is_empty());

        let requests = service.get_friend_request_list("u-bob").await.unwrap();
        assert_eq!(requests.requests_received, vec!["alice"]);
    }

    #[tokio::test]
    async fn test_duplicate_request_is_flagged_not_resent() {
        let service = service();

        service.send_friend_request("u-alice", "bob").await.unwrap();
        let response = service.send_friend_request("u-alice", "bob").await.unwrap();
        assert_eq!(flags(&response), (false, true));

        // Same pair from the other side is a duplicate as well.
        let response = service.send_friend_request("u-bob", "alice").await.unwrap();
        assert_eq!(flags(&response), (false, true));

        let requests = service.get_friend_request_list("u-bob").await.unwrap();
        assert_eq!(requests.requests_received, vec!["alice"]);
        assert!(requests.requests_sent.is_empty());
    }

    #[tokio::test]
    async fn test_send_losing_the_insert_race_reports_duplicate() {
        let directory =
            FakeDirectory { users: vec![user("u-alice", "alice"), user("u-bob", "bob")] };
        let service =
            FriendService::with_dependencies(Arc::new(ContestedRelations), Arc::new(directory));

        // The lookup saw nothing, yet the insert found the pair claimed.
        let response = service.send_friend_request("u-alice", "bob").await.unwrap();
        assert_eq!(flags(&response), (false, true));
    }

    #[tokio::test]
    async fn test_send_to_unknown_user_reports_nothing_sent() {
        let service = service();
        let response = service.send_friend_request("u-alice", "nobody").await.unwrap();
        assert_eq!(flags(&response), (false, false));
    }

    #[tokio::test]
    async fn test_send_to_self_reports_nothing_sent() {
        let service = service();
        let response = service.send_friend_request("u-alice", "alice").await.unwrap();
        assert_eq!(flags(&response), (false, false));

        let requests = service.get_friend_request_list("u-alice").await.unwrap();
        assert!(requests.requests_sent.is_empty());
    }

    #[tokio::test]
    async fn test_send_between_friends_reports_already_exists() {
        let service = service();
        service.send_friend_request("u-alice", "bob").await.unwrap();
        service.resolve_friend_request("u-bob", "alice", true).await.unwrap();

        let response = service.send_friend_request("u-alice", "bob").await.unwrap();
        assert_eq!(flags(&response), (true, true));
        let response = service.send_friend_request("u-bob", "alice").await.unwrap();
        assert_eq!(flags(&response), (true, true));
    }

    #[tokio::test]
    async fn test_accept_makes_both_sides_friends() {
        let service = service();
        service.send_friend_request("u-alice", "bob").await.unwrap();

        let accepted = service.resolve_friend_request("u-bob", "alice", true).await.unwrap();
        assert!(accepted);

        let friends = service.get_friend_list("u-alice").await.unwrap();
        assert_eq!(friends.friends, vec!["bob"]);
        let friends = service.get_friend_list("u-bob").await.unwrap();
        assert_eq!(friends.friends, vec!["alice"]);

        // The pending entry is gone from both request lists.
        let requests = service.get_friend_request_list("u-alice").await.unwrap();
        assert!(requests.requests_sent.is_empty());
        let requests = service.get_friend_request_list("u-bob").await.unwrap();
        assert!(requests.requests_received.is_empty());
    }

    #[tokio::test]
    async fn test_reject_clears_the_request_and_allows_resend() {
        let service = service();
        service.send_friend_request("u-alice", "bob").await.unwrap();

        let resolved = service.resolve_friend_request("u-bob", "alice", false).await.unwrap();
        assert!(resolved);

        let friends = service.get_friend_list("u-bob").await.unwrap();
        assert!(friends.friends.is_empty());

        let response = service.send_friend_request("u-alice", "bob").await.unwrap();
        assert_eq!(flags(&response), (true, false));
    }

    #[tokio::test]
    async fn test_only_the_addressed_direction_can_accept() {
        let service = service();
        service.send_friend_request("u-alice", "bob").await.unwrap();

        // alice resolving "a request from bob" matches nothing.
        let resolved = service.resolve_friend_request("u-alice", "bob", true).await.unwrap();
        assert!(!resolved);

        let friends = service.get_friend_list("u-alice").await.unwrap();
        assert!(friends.friends.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_with_unknown_sender_reports_false() {
        let service = service();
        let resolved = service.resolve_friend_request("u-bob", "nobody", true).await.unwrap();
        assert!(!resolved);
    }

    #[tokio::test]
    async fn test_remove_friend_works_from_either_side() {
        let service = service();
        service.send_friend_request("u-alice", "bob").await.unwrap();
        service.resolve_friend_request("u-bob", "alice", true).await.unwrap();

        // bob received the original request but can still remove.
        let removed = service.remove_friend("u-bob", "alice").await.unwrap();
        assert!(removed);

        assert!(service.get_friend_list("u-alice").await.unwrap().friends.is_empty());
        assert!(service.get_friend_list("u-bob").await.unwrap().friends.is_empty());

        let removed = service.remove_friend("u-bob", "alice").await.unwrap();
        assert!(!removed);
    }

    #[tokio::test]
    async fn test_remove_cancels_an_outgoing_pending_request() {
        let service = service();
        service.send_friend_request("u-alice", "bob").await.unwrap();

        let removed = service.remove_friend("u-alice", "bob").await.unwrap();
        assert!(removed);

        let requests = service.get_friend_request_list("u-bob").await.unwrap();
        assert!(requests.requests_received.is_empty());

        // The pair is free again, from either side.
        let response = service.send_friend_request("u-bob", "alice").await.unwrap();
        assert_eq!(flags(&response), (true, false));
    }

    #[tokio::test]
    async fn test_friend_lists_are_per_user() {
        let service = service();
        service.send_friend_request("u-alice", "bob").await.unwrap();
        service.resolve_friend_request("u-bob", "alice", true).await.unwrap();
        service.send_friend_request("u-carol", "bob").await.unwrap();

        let friends = service.get_friend_list("u-bob").await.unwrap();
        assert_eq!(friends.friends, vec!["alice"]);

        let requests = service.get_friend_request_list("u-bob").await.unwrap();
        assert_eq!(requests.requests_received, vec!["carol"]);

        assert!(service.get_friend_list("u-carol").await.unwrap().friends.is_empty());
    }
}

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    #[validate(length(min = 1, message = "Recipient username cannot be empty"))]
    pub recipient_username: String,
}

/// Body of acceptFriendRequest. `recipient_username` names the original
/// SENDER of the request being resolved; the wire name is kept for client
/// compatibility.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResolveFriendRequestBody {
    #[validate(length(min = 1, message = "Recipient username cannot be empty"))]
    pub recipient_username: String,
    pub accept: bool,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct SendFriendRequestResponse {
    pub friend_request_sent: bool,
    pub friend_request_already_exist: bool,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct AcceptFriendRequestResponse {
    pub friend_request_accepted: bool,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct RemoveFriendResponse {
    pub friend_removed: bool,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct FriendListResponse {
    pub friends: Vec<String>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct FriendRequestListResponse {
    pub requests_sent: Vec<String>,
    pub requests_received: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_bodies_use_camel_case() {
        let body: FriendRequestBody =
            serde_json::from_str(r#"{"recipientUsername": "bob"}"#).unwrap();
        assert_eq!(body.recipient_username, "bob");

        let body: ResolveFriendRequestBody =
            serde_json::from_str(r#"{"recipientUsername": "alice", "accept": true}"#).unwrap();
        assert_eq!(body.recipient_username, "alice");
        assert!(body.accept);
    }

    #[test]
    fn test_responses_keep_snake_case_field_names() {
        let json = serde_json::to_string(&SendFriendRequestResponse {
            friend_request_sent: true,
            friend_request_already_exist: false,
        })
        .unwrap();
        assert!(json.contains("\"friend_request_sent\":true"));
        assert!(json.contains("\"friend_request_already_exist\":false"));

        let json = serde_json::to_string(&FriendRequestListResponse {
            requests_sent: vec!["bob".to_string()],
            requests_received: vec![],
        })
        .unwrap();
        assert!(json.contains("\"requests_sent\":[\"bob\"]"));
        assert!(json.contains("\"requests_received\":[]"));

        let json =
            serde_json::to_string(&FriendListResponse { friends: vec!["bob".to_string()] })
                .unwrap();
        assert_eq!(json, r#"{"friends":["bob"]}"#);
    }
}

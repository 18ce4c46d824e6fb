use actix_web::{get, post, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::{
            model::{
                AcceptFriendRequestResponse, FriendListResponse, FriendRequestBody,
                FriendRequestListResponse, RemoveFriendResponse, ResolveFriendRequestBody,
                SendFriendRequestResponse,
            },
            repository_pg::FriendRepositoryPg,
            service::FriendService,
        },
        user::repository_pg::UserRepositoryPg,
    },
    utils::ValidatedJson,
};

pub type FriendSvc = FriendService<FriendRepositoryPg, UserRepositoryPg>;

#[get("/getFriendList")]
pub async fn get_friend_list(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<FriendListResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let friends = friend_service.get_friend_list(&user_id).await?;

    Ok(success::Success::ok(friends))
}

#[get("/getFriendRequestList")]
pub async fn get_friend_request_list(
    friend_service: web::Data<FriendSvc>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestListResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let requests = friend_service.get_friend_request_list(&user_id).await?;

    Ok(success::Success::ok(requests))
}

#[post("/sendFriendRequest")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendSvc>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<SendFriendRequestResponse>, error::Error> {
    let sender_id = get_claims(&req)?.sub;
    let response =
        friend_service.send_friend_request(&sender_id, &body.0.recipient_username).await?;

    Ok(success::Success::ok(response))
}

#[post("/acceptFriendRequest")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendSvc>,
    body: ValidatedJson<ResolveFriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<AcceptFriendRequestResponse>, error::Error> {
    let recipient_id = get_claims(&req)?.sub;
    let accepted = friend_service
        .resolve_friend_request(&recipient_id, &body.0.recipient_username, body.0.accept)
        .await?;

    Ok(success::Success::ok(AcceptFriendRequestResponse { friend_request_accepted: accepted }))
}

#[post("/removeFriend")]
pub async fn remove_friend(
    friend_service: web::Data<FriendSvc>,
    body: ValidatedJson<FriendRequestBody>,
    req: HttpRequest,
) -> Result<success::Success<RemoveFriendResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let removed = friend_service.remove_friend(&user_id, &body.0.recipient_username).await?;

    Ok(success::Success::ok(RemoveFriendResponse { friend_removed: removed }))
}

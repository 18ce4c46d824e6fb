use actix_web::{get, post, put, web, HttpRequest};

use crate::middlewares::get_claims;
use crate::modules::user::{model, service::UserService};
use crate::{
    api::{error, success},
    utils::{ValidatedJson, ValidatedQuery},
};

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignUpModel>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.sign_up(id, user_data.0).await?;
    Ok(success::Success::created(user))
}

#[get("/checkUsername")]
pub async fn check_username(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::UsernameQuery>,
) -> Result<success::Success<model::UsernameCheckResponse>, error::Error> {
    let available = user_service.username_available(&query.0.username).await?;
    Ok(success::Success::ok(model::UsernameCheckResponse { available }))
}

#[get("/checkUserEmailExistence")]
pub async fn check_user_email_existence(
    user_service: web::Data<UserService>,
    query: ValidatedQuery<model::UserEmailQuery>,
) -> Result<success::Success<model::UserEmailCheckResponse>, error::Error> {
    let exists = user_service.email_exists(&query.0.user_email).await?;
    Ok(success::Success::ok(model::UserEmailCheckResponse { exists }))
}

#[put("/{username}/nickname")]
pub async fn update_nickname(
    user_service: web::Data<UserService>,
    username: web::Path<String>,
    user_data: ValidatedJson<model::NicknameUpdateModel>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let caller_id = get_claims(&req)?.sub;
    let user =
        user_service.update_nickname(&caller_id, &username, &user_data.0.nickname).await?;
    Ok(success::Success::ok(user))
}

#[get("/{username}")]
pub async fn get_user(
    user_service: web::Data<UserService>,
    username: web::Path<String>,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let user = user_service.get_by_username(&username).await?;
    Ok(success::Success::ok(user))
}

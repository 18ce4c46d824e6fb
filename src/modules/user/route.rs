use crate::modules::user::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    // Literal paths must come before the `{username}` matcher.
    cfg.service(
        scope("/users")
            .service(sign_up)
            .service(check_username)
            .service(check_user_email_existence)
            .service(update_nickname)
            .service(get_user),
    );
}

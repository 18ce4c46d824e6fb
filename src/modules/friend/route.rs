use crate::modules::friend::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(get_friend_list)
            .service(get_friend_request_list)
            .service(send_friend_request)
            .service(accept_friend_request)
            .service(remove_friend),
    );
}

use crate::modules::friend::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(list_friends)
            .service(list_sent_requests)
            .service(list_received_requests)
            .service(list_friends_of_user)
            .service(send_friend_request)
            .service(accept_friend_request),
    );
}

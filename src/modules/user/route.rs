use crate::modules::user::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/auth").service(sign_up).service(sign_in).service(refresh).service(sign_out),
    );
}

pub fn configure(cfg: &mut ServiceConfig) {
    // static segments first, `/{username}` would shadow them
    cfg.service(
        scope("/users")
            .service(get_profile)
            .service(update_profile)
            .service(list_users)
            .service(get_user),
    );
}

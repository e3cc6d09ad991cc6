use crate::modules::account::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/account")
            .service(open_account)
            .service(close_account)
            .service(deactivate_account),
    );
}

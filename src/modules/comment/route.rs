use crate::modules::comment::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/comments").service(create_comment).service(list_comments).service(delete_comment),
    );
}

use crate::modules::post::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/posts")
            .service(create_post)
            .service(list_all_posts)
            .service(list_my_posts)
            .service(get_my_post)
            .service(friends_feed)
            .service(list_user_posts)
            .service(get_post)
            .service(update_post)
            .service(like_post)
            .service(delete_post),
    );
}

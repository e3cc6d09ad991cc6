use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{RedisCache, connect_database},
    middlewares::{authentication, authorization},
    modules::{
        account::service::AccountService,
        comment::{repository_pg::CommentRepositoryPg, service::CommentService},
        friend::{repository_pg::FriendRepositoryPg, service::FriendService},
        post::{repository_pg::PostRepositoryPg, service::PostService},
        user::{repository_pg::UserRepositoryPg, schema::UserRole, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let redis_cache =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let friend_repo = Arc::new(FriendRepositoryPg::new(db_pool.clone()));
    let post_repo = Arc::new(PostRepositoryPg::new(db_pool.clone()));
    let comment_repo = Arc::new(CommentRepositoryPg::new(db_pool.clone()));

    let user_service = UserService::with_dependencies(user_repo.clone(), Arc::new(redis_cache));
    let friend_service = FriendService::with_dependencies(friend_repo, user_repo.clone());
    let account_service = AccountService::with_dependencies(user_repo);
    let post_service = PostService::with_dependencies(post_repo, friend_service.clone());
    let comment_service = CommentService::with_dependencies(comment_repo, post_service.clone());

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(account_service.clone()))
            .app_data(web::Data::new(post_service.clone()))
            .app_data(web::Data::new(comment_service.clone()))
            .service(health_check)
            .service(
                web::scope("/api").configure(modules::user::route::public_api_configure).service(
                    web::scope("")
                        .wrap(from_fn(authorization(vec![UserRole::User, UserRole::Admin])))
                        .wrap(from_fn(authentication))
                        .configure(modules::user::route::configure)
                        .configure(modules::account::route::configure)
                        .configure(modules::friend::route::configure)
                        .configure(modules::post::route::configure)
                        .configure(modules::comment::route::configure),
                ),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(ENV.workers)
    .run()
    .await
}

use actix_web::{HttpRequest, delete, get, patch, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        friend::repository_pg::FriendRepositoryPg,
        post::{
            model::{PostBody, PostResponse},
            repository_pg::PostRepositoryPg,
            service::PostService,
        },
        user::repository_pg::UserRepositoryPg,
    },
    utils::ValidatedJson,
};

pub type PostSvc = PostService<PostRepositoryPg, FriendRepositoryPg, UserRepositoryPg>;

#[post("")]
pub async fn create_post(
    post_service: web::Data<PostSvc>,
    body: ValidatedJson<PostBody>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let post = post_service.create_post(user_id, body.0.caption).await?;
    Ok(success::Success::created(Some(post)).message("Post created successfully"))
}

#[get("/all")]
pub async fn list_all_posts(
    post_service: web::Data<PostSvc>,
) -> Result<success::Success<Vec<PostResponse>>, error::Error> {
    let posts = post_service.all_posts().await?;
    Ok(success::Success::ok(Some(posts)).message("Posts retrieved successfully"))
}

#[get("/mine")]
pub async fn list_my_posts(
    post_service: web::Data<PostSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PostResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let posts = post_service.my_posts(user_id).await?;
    Ok(success::Success::ok(Some(posts)).message("Posts retrieved successfully"))
}

#[get("/mine/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_my_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let post = post_service.my_post(user_id, post_id.into_inner()).await?;
    Ok(success::Success::ok(Some(post)).message("Post retrieved successfully"))
}

#[get("/feed")]
pub async fn friends_feed(
    post_service: web::Data<PostSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PostResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let posts = post_service.feed_of_friends(user_id).await?;
    Ok(success::Success::ok(Some(posts)).message("Friends posts retrieved successfully"))
}

#[get("/user/{username}")]
pub async fn list_user_posts(
    post_service: web::Data<PostSvc>,
    username: web::Path<String>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PostResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let posts = post_service.posts_by_username(user_id, &username).await?;
    Ok(success::Success::ok(Some(posts)).message("Posts retrieved successfully"))
}

#[get("/{id:[0-9a-fA-F-]{36}}")]
pub async fn get_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let post = post_service.get_post(user_id, post_id.into_inner()).await?;
    Ok(success::Success::ok(Some(post)).message("Post retrieved successfully"))
}

#[patch("/{id:[0-9a-fA-F-]{36}}")]
pub async fn update_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    body: ValidatedJson<PostBody>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let post = post_service.update_caption(user_id, post_id.into_inner(), body.0.caption).await?;
    Ok(success::Success::ok(Some(post)).message("Post updated successfully"))
}

#[post("/{id:[0-9a-fA-F-]{36}}/like")]
pub async fn like_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<PostResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let post = post_service.like_toggle(user_id, post_id.into_inner()).await?;
    Ok(success::Success::ok(Some(post)))
}

#[delete("/{id:[0-9a-fA-F-]{36}}")]
pub async fn delete_post(
    post_service: web::Data<PostSvc>,
    post_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let claims = get_claims(&req)?;
    post_service.inactivate_post(claims.sub, &claims.role, post_id.into_inner()).await?;
    Ok(success::Success::ok(None).message("Post was deleted"))
}

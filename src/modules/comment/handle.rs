use actix_web::{HttpRequest, delete, get, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        comment::{
            model::{CommentBody, CommentResponse},
            repository_pg::CommentRepositoryPg,
            service::CommentService,
        },
        friend::repository_pg::FriendRepositoryPg,
        post::repository_pg::PostRepositoryPg,
        user::repository_pg::UserRepositoryPg,
    },
    utils::ValidatedJson,
};

pub type CommentSvc =
    CommentService<CommentRepositoryPg, PostRepositoryPg, FriendRepositoryPg, UserRepositoryPg>;

#[post("/post/{post_id}")]
pub async fn create_comment(
    comment_service: web::Data<CommentSvc>,
    post_id: web::Path<Uuid>,
    body: ValidatedJson<CommentBody>,
    req: HttpRequest,
) -> Result<success::Success<CommentResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let comment =
        comment_service.create_comment(user_id, post_id.into_inner(), body.0.message).await?;
    Ok(success::Success::created(Some(comment)).message("Comment created successfully"))
}

#[get("/post/{post_id}")]
pub async fn list_comments(
    comment_service: web::Data<CommentSvc>,
    post_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<CommentResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let comments = comment_service.list_comments(user_id, post_id.into_inner()).await?;
    Ok(success::Success::ok(Some(comments)).message("Comments retrieved successfully"))
}

#[delete("/{id}")]
pub async fn delete_comment(
    comment_service: web::Data<CommentSvc>,
    comment_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let claims = get_claims(&req)?;
    comment_service.delete_comment(claims.sub, &claims.role, comment_id.into_inner()).await?;
    Ok(success::Success::ok(None).message("Comment was deleted"))
}

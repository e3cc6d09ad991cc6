use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        comment::{
            model::{CommentResponse, InsertComment},
            repository::CommentRepository,
        },
        friend::repository::FriendRepository,
        post::{repository::PostRepository, service::PostService},
        user::{
            repository::UserRepository,
            schema::{Status, UserRole},
            service::resolve_current_user,
        },
    },
};

/// Comments follow the visibility of the post they hang off.
#[derive(Clone)]
pub struct CommentService<C, P, F, U>
where
    C: CommentRepository + Send + Sync,
    P: PostRepository + Send + Sync,
    F: FriendRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    comment_repo: Arc<C>,
    post_service: PostService<P, F, U>,
}

impl<C, P, F, U> CommentService<C, P, F, U>
where
    C: CommentRepository + Send + Sync,
    P: PostRepository + Send + Sync,
    F: FriendRepository + Send + Sync,
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(comment_repo: Arc<C>, post_service: PostService<P, F, U>) -> Self {
        info!("CommentService initialized with dependencies");
        CommentService { comment_repo, post_service }
    }

    pub async fn create_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        message: String,
    ) -> Result<CommentResponse, error::SystemError> {
        let user = resolve_current_user(self.post_service.user_repo(), &user_id).await?;
        let post = self.post_service.visible_post(&user.id, &post_id).await?;

        let comment = self
            .comment_repo
            .create(&InsertComment {
                post_id: post.id,
                user_id: user.id,
                username: user.username.clone(),
                message,
            })
            .await?;

        info!("User {} commented on post {}", user.username, post.id);
        Ok(CommentResponse::from(comment))
    }

    pub async fn list_comments(
        &self,
        viewer_id: Uuid,
        post_id: Uuid,
    ) -> Result<Vec<CommentResponse>, error::SystemError> {
        let viewer = resolve_current_user(self.post_service.user_repo(), &viewer_id).await?;
        let post = self.post_service.visible_post(&viewer.id, &post_id).await?;

        let comments = self.comment_repo.find_by_post_with_status(&post.id, Status::Active).await?;
        Ok(comments.into_iter().map(CommentResponse::from).collect())
    }

    /// Soft delete, by the author or an admin.
    pub async fn delete_comment(
        &self,
        user_id: Uuid,
        role: &UserRole,
        comment_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let user = resolve_current_user(self.post_service.user_repo(), &user_id).await?;
        let not_found = || {
            error::SystemError::comment_not_found(format!("Comment not found with ID {comment_id}"))
        };

        let comment = self
            .comment_repo
            .find_by_id(&comment_id)
            .await?
            .filter(|c| c.status != Status::Inactive)
            .ok_or_else(not_found)?;

        if comment.user_id != user.id && *role != UserRole::Admin {
            return Err(error::SystemError::forbidden("You are not allowed to delete this comment"));
        }

        self.comment_repo.set_status(&comment.id, Status::Inactive).await?.ok_or_else(not_found)?;
        info!("Comment {} deleted by {}", comment_id, user.username);
        Ok(())
    }
}

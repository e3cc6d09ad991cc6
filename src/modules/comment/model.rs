use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::comment::schema::CommentEntity;

#[derive(Deserialize, Validate)]
pub struct CommentBody {
    #[validate(length(min = 1, max = 1000, message = "Comment must be 1 to 1000 characters long"))]
    pub message: String,
}

pub struct InsertComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub username: String,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CommentEntity> for CommentResponse {
    fn from(comment: CommentEntity) -> Self {
        CommentResponse {
            id: comment.id,
            post_id: comment.post_id,
            username: comment.username,
            message: comment.message,
            created_at: comment.created_at,
        }
    }
}

use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::user::schema::Status;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentEntity {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub message: String,
    pub status: Status,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

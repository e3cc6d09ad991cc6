use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::user::schema::Status;

/// A post joined with its owner's username.
///
/// `likes` always equals `liked_users.len()`; both are only ever written
/// together from a [`LikeState`](crate::modules::post::model::LikeState).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub caption: String,
    pub likes: i32,
    pub liked_users: Vec<String>,
    pub status: Status,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

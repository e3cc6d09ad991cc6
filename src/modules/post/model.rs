use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::post::schema::PostEntity;
use crate::modules::user::schema::Status;

#[derive(Deserialize, Validate)]
pub struct PostBody {
    #[validate(length(min = 1, max = 2000, message = "Caption must be 1 to 2000 characters long"))]
    pub caption: String,
}

pub struct InsertPost {
    pub user_id: Uuid,
    pub caption: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub caption: String,
    pub username: String,
    pub likes: i32,
    pub liked_users: Vec<String>,
    pub status: Status,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PostEntity> for PostResponse {
    fn from(post: PostEntity) -> Self {
        PostResponse {
            id: post.id,
            caption: post.caption,
            username: post.username,
            likes: post.likes,
            liked_users: post.liked_users,
            status: post.status,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeState {
    pub likes: i32,
    pub liked_users: Vec<String>,
}

/// Toggles `username` in the liked set: removes it when present, adds it
/// otherwise. The count is derived from the resulting set.
pub fn toggle_like(liked_users: &[String], username: &str) -> LikeState {
    let already_liked = liked_users.iter().any(|u| u == username);

    let mut next: Vec<String> = Vec::with_capacity(liked_users.len() + 1);
    for user in liked_users {
        if user != username && !next.contains(user) {
            next.push(user.clone());
        }
    }
    if !already_liked {
        next.push(username.to_string());
    }

    LikeState { likes: like_count(next.len()), liked_users: next }
}

/// Saturates instead of wrapping; the column `CHECK` rejects a count that
/// no longer matches the set.
fn like_count(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::user::schema::{Status, UserEntity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub status: Status,
}

impl From<UserEntity> for FriendResponse {
    fn from(user: UserEntity) -> Self {
        FriendResponse {
            display_name: user.display_name(),
            id: user.id,
            username: user.username,
            bio: user.bio,
            status: user.status,
        }
    }
}

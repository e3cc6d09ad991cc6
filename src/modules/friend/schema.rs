use serde::Serialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// A directed friend request. `(A, B)` and `(B, A)` are separate rows; either
/// one being accepted makes A and B friends.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FriendLinkEntity {
    pub id: Uuid,
    pub first_user_id: Uuid,
    pub second_user_id: Uuid,
    pub is_accepted: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

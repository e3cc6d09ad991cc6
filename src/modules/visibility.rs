//! Who may read a post or profile, given its status and the reader's relation
//! to the owner. Owner-scoped listings ("my posts") bypass this entirely.

use crate::modules::user::schema::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Owner,
    Friend,
    Stranger,
}

pub fn is_visible(status: Status, audience: Audience) -> bool {
    match status {
        Status::Active => true,
        Status::Closed => matches!(audience, Audience::Owner | Audience::Friend),
        Status::Inactive => false,
    }
}

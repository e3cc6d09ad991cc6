use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::schema::FriendLinkEntity;

#[async_trait::async_trait]
pub trait FriendRepository {
    /// Exact directed lookup, never normalizes the pair.
    async fn find_link(
        &self,
        first_user_id: &Uuid,
        second_user_id: &Uuid,
    ) -> Result<Option<FriendLinkEntity>, error::SystemError>;

    /// Inserts an unaccepted `(first, second)` link unless one already exists.
    /// Returns whether a row was created.
    async fn create_link_if_absent(
        &self,
        first_user_id: &Uuid,
        second_user_id: &Uuid,
    ) -> Result<bool, error::SystemError>;

    /// Marks `(first, second)` accepted. `None` when the link does not exist.
    async fn accept_link(
        &self,
        first_user_id: &Uuid,
        second_user_id: &Uuid,
    ) -> Result<Option<FriendLinkEntity>, error::SystemError>;

    async fn list_links_where_first(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendLinkEntity>, error::SystemError>;

    async fn list_links_where_second(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendLinkEntity>, error::SystemError>;
}

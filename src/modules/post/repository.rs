use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        post::{model::InsertPost, schema::PostEntity},
        user::schema::Status,
    },
};

#[async_trait::async_trait]
pub trait PostRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PostEntity>, error::SystemError>;

    /// Most recent first, every status.
    async fn find_by_owner(&self, user_id: &Uuid) -> Result<Vec<PostEntity>, error::SystemError>;

    /// Most recent first, only `status` posts of the given owners.
    async fn find_by_owners_with_status(
        &self,
        user_ids: &[Uuid],
        status: Status,
    ) -> Result<Vec<PostEntity>, error::SystemError>;

    async fn find_all_with_status(
        &self,
        status: Status,
    ) -> Result<Vec<PostEntity>, error::SystemError>;

    async fn create(&self, post: &InsertPost) -> Result<PostEntity, error::SystemError>;

    async fn update_caption(
        &self,
        id: &Uuid,
        caption: &str,
    ) -> Result<Option<PostEntity>, error::SystemError>;

    async fn set_status(
        &self,
        id: &Uuid,
        status: Status,
    ) -> Result<Option<PostEntity>, error::SystemError>;

    /// Read-modify-write of the like set under a per-post lock.
    async fn toggle_like(
        &self,
        id: &Uuid,
        username: &str,
    ) -> Result<Option<PostEntity>, error::SystemError>;
}

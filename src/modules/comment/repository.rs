use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        comment::{model::InsertComment, schema::CommentEntity},
        user::schema::Status,
    },
};

#[async_trait::async_trait]
pub trait CommentRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CommentEntity>, error::SystemError>;

    /// Oldest first.
    async fn find_by_post_with_status(
        &self,
        post_id: &Uuid,
        status: Status,
    ) -> Result<Vec<CommentEntity>, error::SystemError>;

    async fn create(&self, comment: &InsertComment) -> Result<CommentEntity, error::SystemError>;

    async fn set_status(
        &self,
        id: &Uuid,
        status: Status,
    ) -> Result<Option<CommentEntity>, error::SystemError>;
}

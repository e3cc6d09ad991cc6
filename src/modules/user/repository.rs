use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser},
        schema::{Status, UserEntity},
    },
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError>;

    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError>;

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError>;

    /// Sets the user's status and rewrites every post they own to the same
    /// status as one unit. Either all rows move or none do.
    async fn set_status_cascade(
        &self,
        id: &Uuid,
        status: Status,
    ) -> Result<UserEntity, error::SystemError>;
}

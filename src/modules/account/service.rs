use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::UserResponse,
        repository::UserRepository,
        schema::Status,
        service::resolve_current_user,
    },
};

/// Account visibility: `Active <-> Closed`, `Active -> Inactive`.
///
/// Every transition re-applies the status to all of the user's posts, even
/// when the user is already in the target state.
#[derive(Clone)]
pub struct AccountService<U>
where
    U: UserRepository + Send + Sync,
{
    user_repo: Arc<U>,
}

impl<U> AccountService<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn with_dependencies(user_repo: Arc<U>) -> Self {
        info!("AccountService initialized with dependencies");
        AccountService { user_repo }
    }

    /// Visible to everyone.
    pub async fn open(&self, user_id: Uuid) -> Result<UserResponse, error::SystemError> {
        self.transition(user_id, Status::Active).await
    }

    /// Visible to friends only.
    pub async fn close(&self, user_id: Uuid) -> Result<UserResponse, error::SystemError> {
        self.transition(user_id, Status::Closed).await
    }

    /// Soft delete. The account stops resolving afterwards, so there is no way back.
    pub async fn deactivate(&self, user_id: Uuid) -> Result<UserResponse, error::SystemError> {
        self.transition(user_id, Status::Inactive).await
    }

    async fn transition(
        &self,
        user_id: Uuid,
        status: Status,
    ) -> Result<UserResponse, error::SystemError> {
        let user = resolve_current_user(self.user_repo.as_ref(), &user_id).await?;
        let updated = self.user_repo.set_status_cascade(&user.id, status).await?;

        info!("Account {} is now {:?}", updated.username, status);
        Ok(UserResponse::from(updated))
    }
}

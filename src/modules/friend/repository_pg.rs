use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{repository::FriendRepository, schema::FriendLinkEntity},
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryPg {
    async fn find_link(
        &self,
        first_user_id: &Uuid,
        second_user_id: &Uuid,
    ) -> Result<Option<FriendLinkEntity>, error::SystemError> {
        let link = sqlx::query_as::<_, FriendLinkEntity>(
            "SELECT * FROM friends WHERE first_user_id = $1 AND second_user_id = $2",
        )
        .bind(first_user_id)
        .bind(second_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    async fn create_link_if_absent(
        &self,
        first_user_id: &Uuid,
        second_user_id: &Uuid,
    ) -> Result<bool, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));

        // the unique (first_user_id, second_user_id) constraint serializes racing senders
        let rows = sqlx::query(
            r#"
            INSERT INTO friends (id, first_user_id, second_user_id, is_accepted)
            VALUES ($1, $2, $3, FALSE)
            ON CONFLICT (first_user_id, second_user_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(first_user_id)
        .bind(second_user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn accept_link(
        &self,
        first_user_id: &Uuid,
        second_user_id: &Uuid,
    ) -> Result<Option<FriendLinkEntity>, error::SystemError> {
        let link = sqlx::query_as::<_, FriendLinkEntity>(
            r#"
            UPDATE friends
            SET is_accepted = TRUE
            WHERE first_user_id = $1 AND second_user_id = $2
            RETURNING *
            "#,
        )
        .bind(first_user_id)
        .bind(second_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    async fn list_links_where_first(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendLinkEntity>, error::SystemError> {
        let links = sqlx::query_as::<_, FriendLinkEntity>(
            "SELECT * FROM friends WHERE first_user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    async fn list_links_where_second(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendLinkEntity>, error::SystemError> {
        let links = sqlx::query_as::<_, FriendLinkEntity>(
            "SELECT * FROM friends WHERE second_user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }
}

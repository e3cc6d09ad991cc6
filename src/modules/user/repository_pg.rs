use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser},
        repository::UserRepository,
        schema::{Status, UserEntity},
    },
};

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            "SELECT * FROM users WHERE lower(username) = lower($1)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserEntity>, error::SystemError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_all(&self) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = sqlx::query_as::<_, UserEntity>("SELECT * FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (id, username, email, hash_password, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.hash_password)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: &Uuid, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
        UPDATE users
        SET
            email      = COALESCE($2, email),
            first_name = COALESCE($3, first_name),
            last_name  = COALESCE($4, last_name),
            bio        = CASE WHEN $5::boolean THEN $6 ELSE bio END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
        )
        .bind(id)
        .bind(&user.email) // $2: Option<String>
        .bind(&user.first_name) // $3: Option<String>
        .bind(&user.last_name) // $4: Option<String>
        .bind(user.bio.is_some()) // $5: bool - was bio provided?
        .bind(user.bio.as_ref().and_then(|v| v.as_ref())) // $6: Option<&String>
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::user_not_found("User not found"))?;

        Ok(user)
    }

    async fn set_status_cascade(
        &self,
        id: &Uuid,
        status: Status,
    ) -> Result<UserEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        // Lock the owner row so concurrent cascades for one user run one after another.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| error::SystemError::user_not_found("User not found"))?;

        let user = sqlx::query_as::<_, UserEntity>(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        let posts = sqlx::query("UPDATE posts SET status = $2, updated_at = NOW() WHERE user_id = $1")
            .bind(id)
            .bind(status)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        log::info!("User {} moved to {:?} with {} posts", user.username, status, posts);
        Ok(user)
    }
}

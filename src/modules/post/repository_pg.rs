use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        post::{
            model::{InsertPost, toggle_like},
            repository::PostRepository,
            schema::PostEntity,
        },
        user::schema::Status,
    },
};

const SELECT_POSTS: &str = r#"
    SELECT p.id, p.user_id, u.username, p.caption, p.likes, p.liked_users,
           p.status, p.created_at, p.updated_at
    FROM posts p
    JOIN users u ON u.id = p.user_id
"#;

/// Wraps a data-modifying statement ending in `RETURNING *` so the written row
/// comes back joined with its owner's username.
fn with_owner(statement: &str) -> String {
    format!(
        r#"
        WITH written AS ({statement})
        SELECT w.id, w.user_id, u.username, w.caption, w.likes, w.liked_users,
               w.status, w.created_at, w.updated_at
        FROM written w
        JOIN users u ON u.id = w.user_id
        "#
    )
}

#[derive(Clone)]
pub struct PostRepositoryPg {
    pool: sqlx::PgPool,
}

impl PostRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostRepository for PostRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<PostEntity>, error::SystemError> {
        let query = format!("{SELECT_POSTS} WHERE p.id = $1");
        let post = sqlx::query_as::<_, PostEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn find_by_owner(&self, user_id: &Uuid) -> Result<Vec<PostEntity>, error::SystemError> {
        let query = format!("{SELECT_POSTS} WHERE p.user_id = $1 ORDER BY p.created_at DESC");
        let posts = sqlx::query_as::<_, PostEntity>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn find_by_owners_with_status(
        &self,
        user_ids: &[Uuid],
        status: Status,
    ) -> Result<Vec<PostEntity>, error::SystemError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "{SELECT_POSTS} WHERE p.user_id = ANY($1) AND p.status = $2 ORDER BY p.created_at DESC"
        );
        let posts = sqlx::query_as::<_, PostEntity>(&query)
            .bind(user_ids)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn find_all_with_status(
        &self,
        status: Status,
    ) -> Result<Vec<PostEntity>, error::SystemError> {
        let query = format!("{SELECT_POSTS} WHERE p.status = $1 ORDER BY p.created_at DESC");
        let posts = sqlx::query_as::<_, PostEntity>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn create(&self, post: &InsertPost) -> Result<PostEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let query = with_owner(
            "INSERT INTO posts (id, user_id, caption) VALUES ($1, $2, $3) RETURNING *",
        );
        let post = sqlx::query_as::<_, PostEntity>(&query)
            .bind(id)
            .bind(post.user_id)
            .bind(&post.caption)
            .fetch_one(&self.pool)
            .await?;
        Ok(post)
    }

    async fn update_caption(
        &self,
        id: &Uuid,
        caption: &str,
    ) -> Result<Option<PostEntity>, error::SystemError> {
        let query = with_owner(
            "UPDATE posts SET caption = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        );
        let post = sqlx::query_as::<_, PostEntity>(&query)
            .bind(id)
            .bind(caption)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn set_status(
        &self,
        id: &Uuid,
        status: Status,
    ) -> Result<Option<PostEntity>, error::SystemError> {
        let query =
            with_owner("UPDATE posts SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *");
        let post = sqlx::query_as::<_, PostEntity>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn toggle_like(
        &self,
        id: &Uuid,
        username: &str,
    ) -> Result<Option<PostEntity>, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let liked_users = sqlx::query_scalar::<_, Vec<String>>(
            "SELECT liked_users FROM posts WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(liked_users) = liked_users else {
            tx.rollback().await?;
            return Ok(None);
        };

        let state = toggle_like(&liked_users, username);

        let query = with_owner(
            r#"
            UPDATE posts
            SET likes = $2, liked_users = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        );
        let post = sqlx::query_as::<_, PostEntity>(&query)
            .bind(id)
            .bind(state.likes)
            .bind(&state.liked_users)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(post))
    }
}

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        comment::{model::InsertComment, repository::CommentRepository, schema::CommentEntity},
        user::schema::Status,
    },
};

#[derive(Clone)]
pub struct CommentRepositoryPg {
    pool: sqlx::PgPool,
}

impl CommentRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CommentRepository for CommentRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CommentEntity>, error::SystemError> {
        let comment = sqlx::query_as::<_, CommentEntity>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn find_by_post_with_status(
        &self,
        post_id: &Uuid,
        status: Status,
    ) -> Result<Vec<CommentEntity>, error::SystemError> {
        let comments = sqlx::query_as::<_, CommentEntity>(
            "SELECT * FROM comments WHERE post_id = $1 AND status = $2 ORDER BY created_at",
        )
        .bind(post_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    async fn create(&self, comment: &InsertComment) -> Result<CommentEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let comment = sqlx::query_as::<_, CommentEntity>(
            r#"
            INSERT INTO comments (id, post_id, user_id, username, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(comment.post_id)
        .bind(comment.user_id)
        .bind(&comment.username)
        .bind(&comment.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn set_status(
        &self,
        id: &Uuid,
        status: Status,
    ) -> Result<Option<CommentEntity>, error::SystemError> {
        let comment = sqlx::query_as::<_, CommentEntity>(
            "UPDATE comments SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::data::db_error;
use crate::domain::comment::{Comment, CommentEntry};
use crate::domain::error::DomainError;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError>;
    /// `None` unless the comment exists and belongs to `post_id`.
    async fn find_in_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, DomainError>;
    /// Oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, DomainError>;
    async fn update_text(
        &self,
        comment_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>, DomainError>;
    async fn delete(&self, comment_id: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author_id, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.text)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create comment"))?;

        info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        Ok(comment)
    }

    async fn find_in_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author_id, text, created_at
            FROM comments
            WHERE id = $1 AND post_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find comment"))
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, DomainError> {
        sqlx::query_as::<_, CommentEntry>(
            r#"
            SELECT cm.id, cm.post_id, cm.author_id, cm.text, cm.created_at,
                   u.username AS author_username
            FROM comments cm
            JOIN users u ON u.id = cm.author_id
            WHERE cm.post_id = $1
            ORDER BY cm.created_at ASC, cm.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list comments"))
    }

    async fn update_text(
        &self,
        comment_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>, DomainError> {
        let updated = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET text = $1
            WHERE id = $2
            RETURNING id, post_id, author_id, text, created_at
            "#,
        )
        .bind(text)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("update comment"))?;

        if updated.is_some() {
            info!(comment_id = %comment_id, "comment updated");
        }
        Ok(updated)
    }

    async fn delete(&self, comment_id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete comment"))?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(comment_id = %comment_id, "comment deleted");
        }
        Ok(removed)
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::data::db_error;
use crate::domain::category::Category;
use crate::domain::error::DomainError;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Unpublished categories are treated as absent.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError>;
    async fn list_published(&self) -> Result<Vec<Category>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, title, description, slug, is_published, created_at
            FROM categories
            WHERE slug = $1 AND is_published
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find category by slug"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, title, description, slug, is_published, created_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find category by id"))
    }

    async fn list_published(&self) -> Result<Vec<Category>, DomainError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, title, description, slug, is_published, created_at
            FROM categories
            WHERE is_published
            ORDER BY title
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list categories"))
    }
}

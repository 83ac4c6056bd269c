use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::data::db_error;
use crate::domain::error::DomainError;
use crate::domain::location::Location;

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, DomainError>;
    async fn list_published(&self) -> Result<Vec<Location>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresLocationRepository {
    pool: PgPool,
}

impl PostgresLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, DomainError> {
        sqlx::query_as::<_, Location>(
            "SELECT id, name, is_published, created_at FROM locations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find location by id"))
    }

    async fn list_published(&self) -> Result<Vec<Location>, DomainError> {
        sqlx::query_as::<_, Location>(
            r#"
            SELECT id, name, is_published, created_at
            FROM locations
            WHERE is_published
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list locations"))
    }
}

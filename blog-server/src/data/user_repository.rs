use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::data::{db_error, is_unique_violation};
use crate::domain::error::DomainError;
use crate::domain::user::User;

const USERNAME_CONSTRAINT: &str = "users_username_key";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    async fn update_profile(&self, user: &User) -> Result<User, DomainError>;
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Err(e) if is_unique_violation(&e, USERNAME_CONSTRAINT) => {
                return Err(DomainError::UserAlreadyExists(user.username));
            }
            other => other.map_err(db_error("create user"))?,
        };

        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find user by username"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find user by id"))
    }

    async fn update_profile(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $1, email = $2, first_name = $3, last_name = $4
            WHERE id = $5
            RETURNING id, username, email, first_name, last_name, password_hash, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await;

        let updated = match result {
            Err(e) if is_unique_violation(&e, USERNAME_CONSTRAINT) => {
                return Err(DomainError::UserAlreadyExists(user.username.clone()));
            }
            other => other.map_err(db_error("update profile"))?,
        };

        let updated = updated.ok_or_else(|| DomainError::UserNotFound(user.username.clone()))?;
        info!(user_id = %updated.id, username = %updated.username, "profile updated");
        Ok(updated)
    }
}

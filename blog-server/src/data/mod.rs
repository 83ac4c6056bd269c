pub mod category_repository;
pub mod comment_repository;
pub mod location_repository;
pub mod post_repository;
pub mod user_repository;

#[cfg(test)]
pub mod memory;

use tracing::error;

use crate::domain::error::DomainError;

/// Logs a failed statement and hides the driver error behind `Internal`.
pub(crate) fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| {
        error!(operation, error = %e, "database error");
        DomainError::Internal(format!("database error: {}", e))
    }
}

pub(crate) fn is_unique_violation(e: &sqlx::Error, constraint: &str) -> bool {
    e.as_database_error()
        .and_then(|db| db.constraint())
        .map(|c| c == constraint)
        == Some(true)
}

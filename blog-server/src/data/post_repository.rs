use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::data::db_error;
use crate::domain::error::DomainError;
use crate::domain::feed::{FeedQuery, FeedScope};
use crate::domain::post::{Post, PostEntry};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// The post with author, category, location and comment count.
    async fn find_entry(&self, id: Uuid) -> Result<Option<PostEntry>, DomainError>;
    /// Overwrites every mutable column; `created_at` and the author stay.
    async fn update(&self, post: &Post) -> Result<Option<Post>, DomainError>;
    /// Comments go with the post.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn count_feed(&self, query: &FeedQuery) -> Result<u64, DomainError>;
    async fn list_feed(
        &self,
        query: &FeedQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostEntry>, DomainError>;
}

const ENTRY_COLUMNS: &str = r#"
    SELECT p.id, p.title, p.text, p.pub_date, p.is_published, p.image,
           p.author_id, p.location_id, p.category_id, p.created_at,
           u.username AS author_username,
           c.title AS category_title, c.slug AS category_slug,
           c.is_published AS category_is_published,
           l.name AS location_name, l.is_published AS location_is_published
"#;

const ENTRY_FROM: &str = r#"
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN locations l ON l.id = p.location_id
"#;

const WITH_COMMENT_COUNT: &str =
    ", (SELECT COUNT(DISTINCT cm.id) FROM comments cm WHERE cm.post_id = p.id) AS comment_count";
const WITHOUT_COMMENT_COUNT: &str = ", NULL::BIGINT AS comment_count";

fn select_entries(with_comment_count: bool) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(ENTRY_COLUMNS);
    qb.push(if with_comment_count {
        WITH_COMMENT_COUNT
    } else {
        WITHOUT_COMMENT_COUNT
    });
    qb.push(ENTRY_FROM);
    qb
}

/// SQL form of `FeedQuery::matches`.
fn push_feed_filter(qb: &mut QueryBuilder<'_, Postgres>, query: &FeedQuery) {
    qb.push(" WHERE TRUE");
    match query.scope {
        FeedScope::All => {}
        FeedScope::Category(id) => {
            qb.push(" AND p.category_id = ").push_bind(id);
        }
        FeedScope::Author(id) => {
            qb.push(" AND p.author_id = ").push_bind(id);
        }
    }
    if query.public_only {
        qb.push(" AND p.is_published AND p.pub_date <= ")
            .push_bind(query.now)
            .push(" AND (p.category_id IS NULL OR c.is_published)");
    }
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, title, text, pub_date, is_published, image,
                               author_id, location_id, category_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.text)
        .bind(post.pub_date)
        .bind(post.is_published)
        .bind(&post.image)
        .bind(post.author_id)
        .bind(post.location_id)
        .bind(post.category_id)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create post"))?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, text, pub_date, is_published, image,
                   author_id, location_id, category_id, created_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find post by id"))
    }

    async fn find_entry(&self, id: Uuid) -> Result<Option<PostEntry>, DomainError> {
        let mut qb = select_entries(true);
        qb.push(" WHERE p.id = ").push_bind(id);
        qb.build_query_as::<PostEntry>()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find post entry"))
    }

    async fn update(&self, post: &Post) -> Result<Option<Post>, DomainError> {
        let updated = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                title = $1,
                text = $2,
                pub_date = $3,
                is_published = $4,
                image = $5,
                location_id = $6,
                category_id = $7
            WHERE id = $8
            RETURNING id, title, text, pub_date, is_published, image,
                      author_id, location_id, category_id, created_at
            "#,
        )
        .bind(&post.title)
        .bind(&post.text)
        .bind(post.pub_date)
        .bind(post.is_published)
        .bind(&post.image)
        .bind(post.location_id)
        .bind(post.category_id)
        .bind(post.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("update post"))?;

        if updated.is_some() {
            info!(post_id = %post.id, "post updated");
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete post"))?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(post_id = %id, "post deleted");
        }
        Ok(removed)
    }

    async fn count_feed(&self, query: &FeedQuery) -> Result<u64, DomainError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*)");
        qb.push(ENTRY_FROM);
        push_feed_filter(&mut qb, query);

        let total: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count feed"))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn list_feed(
        &self,
        query: &FeedQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostEntry>, DomainError> {
        let mut qb = select_entries(query.with_comment_count);
        push_feed_filter(&mut qb, query);
        qb.push(" ORDER BY p.pub_date DESC, p.created_at DESC, p.id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        qb.build_query_as::<PostEntry>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list feed"))
    }
}

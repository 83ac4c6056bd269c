use blogicum_server::data::comment_repository::{CommentRepository, PostgresCommentRepository};
use blogicum_server::data::post_repository::{PostRepository, PostgresPostRepository};
use blogicum_server::data::user_repository::{PostgresUserRepository, UserRepository};
use blogicum_server::domain::comment::Comment;
use blogicum_server::domain::post::Post;
use blogicum_server::domain::user::User;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

pub async fn user(pool: &PgPool) -> User {
    let username = unique("writer");
    PostgresUserRepository::new(pool.clone())
        .create(User::new(
            username.clone(),
            format!("{username}@example.com"),
            "not-a-hash".into(),
        ))
        .await
        .expect("insert user")
}

/// Returns the id and slug.
pub async fn category(pool: &PgPool, is_published: bool) -> (Uuid, String) {
    let id = Uuid::new_v4();
    let slug = unique("cat");
    sqlx::query(
        "INSERT INTO categories (id, title, description, slug, is_published) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(slug.to_uppercase())
    .bind("fixture")
    .bind(&slug)
    .bind(is_published)
    .execute(pool)
    .await
    .expect("insert category");
    (id, slug)
}

pub async fn location(pool: &PgPool, is_published: bool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO locations (id, name, is_published) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(unique("place"))
        .bind(is_published)
        .execute(pool)
        .await
        .expect("insert location");
    id
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

pub fn post_by(author: &User, title: &str, pub_date: DateTime<Utc>) -> Post {
    Post::new(author.id, title.into(), "body".into(), pub_date)
}

pub async fn insert_post(pool: &PgPool, post: Post) -> Post {
    PostgresPostRepository::new(pool.clone())
        .create(post)
        .await
        .expect("insert post")
}

pub async fn comment(pool: &PgPool, post: &Post, author: &User, text: &str) -> Comment {
    PostgresCommentRepository::new(pool.clone())
        .create(Comment::new(post.id, author.id, text.into()))
        .await
        .expect("insert comment")
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use crate::domain::category::CategoryRef;
use crate::domain::location::LocationRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub image: Option<String>,
    pub author_id: Uuid,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: Uuid, title: String, text: String, pub_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            text,
            pub_date,
            is_published: true,
            image: None,
            author_id,
            location_id: None,
            category_id: None,
            created_at: Utc::now(),
        }
    }
}

/// A post together with the related rows a page needs to show it.
#[derive(Debug, Clone, Serialize)]
pub struct PostEntry {
    #[serde(flatten)]
    pub post: Post,
    pub author_username: String,
    pub category: Option<CategoryRef>,
    pub location: Option<LocationRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<i64>,
}

impl<'r> FromRow<'r, PgRow> for PostEntry {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let post = Post::from_row(row)?;

        // LEFT JOIN columns are NULL when the reference is unset.
        let category = match post.category_id {
            Some(id) => Some(CategoryRef {
                id,
                title: row.try_get("category_title")?,
                slug: row.try_get("category_slug")?,
                is_published: row.try_get("category_is_published")?,
            }),
            None => None,
        };
        let location = match post.location_id {
            Some(id) => Some(LocationRef {
                id,
                name: row.try_get("location_name")?,
                is_published: row.try_get("location_is_published")?,
            }),
            None => None,
        };

        Ok(Self {
            author_username: row.try_get("author_username")?,
            comment_count: row.try_get("comment_count")?,
            post,
            category,
            location,
        })
    }
}

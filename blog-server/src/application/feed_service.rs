use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::data::category_repository::CategoryRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::feed::FeedQuery;
use crate::domain::page::{Page, Paginator};
use crate::domain::post::PostEntry;
use crate::domain::user::Profile;
use crate::domain::visibility::Viewer;

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            users,
        }
    }

    #[instrument(skip(self))]
    pub async fn index(&self, page: Option<&str>) -> Result<Page<PostEntry>, DomainError> {
        self.paginate(FeedQuery::index(Utc::now()), page).await
    }

    #[instrument(skip(self))]
    pub async fn category(
        &self,
        slug: &str,
        page: Option<&str>,
    ) -> Result<(Category, Page<PostEntry>), DomainError> {
        let category = self
            .categories
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::CategoryNotFound(slug.to_string()))?;
        let posts = self
            .paginate(FeedQuery::category(category.id, Utc::now()), page)
            .await?;
        Ok((category, posts))
    }

    #[instrument(skip(self))]
    pub async fn profile(
        &self,
        viewer: Viewer,
        username: &str,
        page: Option<&str>,
    ) -> Result<(Profile, Page<PostEntry>), DomainError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?;
        let posts = self
            .paginate(FeedQuery::profile(user.id, viewer, Utc::now()), page)
            .await?;
        Ok((Profile::from(&user), posts))
    }

    async fn paginate(
        &self,
        query: FeedQuery,
        page: Option<&str>,
    ) -> Result<Page<PostEntry>, DomainError> {
        let paginator = Paginator::new(self.posts.count_feed(&query).await?);
        let number = paginator.clamp(page);
        let items = self
            .posts
            .list_feed(&query, paginator.limit(), paginator.offset(number))
            .await?;
        debug!(page = number, items = items.len(), "feed page loaded");
        Ok(Page::new(items, number, &paginator))
    }
}

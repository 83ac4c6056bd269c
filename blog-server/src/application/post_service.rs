use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::application::Guarded;
use crate::application::forms::{self, INVALID_CHOICE, TITLE_MAX};
use crate::data::category_repository::CategoryRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::location_repository::LocationRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::category::Category;
use crate::domain::comment::CommentEntry;
use crate::domain::error::{DomainError, FormErrors};
use crate::domain::location::Location;
use crate::domain::post::{Post, PostEntry};
use crate::domain::visibility::{Viewer, can_mutate, can_view};
use crate::presentation::dto::{CreatePostRequest, UpdatePostRequest};

#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub post: PostEntry,
    pub comments: Vec<CommentEntry>,
    pub can_comment: bool,
    pub can_edit: bool,
}

/// Published categories and locations a post may reference.
#[derive(Debug, Serialize)]
pub struct FormChoices {
    pub categories: Vec<Category>,
    pub locations: Vec<Location>,
}

/// Loads a post the viewer is allowed to read; hidden posts look missing.
pub(crate) async fn load_visible(
    posts: &dyn PostRepository,
    viewer: Viewer,
    post_id: Uuid,
) -> Result<PostEntry, DomainError> {
    posts
        .find_entry(post_id)
        .await?
        .filter(|entry| can_view(viewer, entry, Utc::now()))
        .ok_or(DomainError::PostNotFound(post_id))
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            categories,
            locations,
        }
    }

    pub async fn get_detail(&self, viewer: Viewer, post_id: Uuid) -> Result<PostDetail, DomainError> {
        let post = load_visible(self.posts.as_ref(), viewer, post_id).await?;
        let comments = self.comments.list_for_post(post_id).await?;

        Ok(PostDetail {
            can_comment: viewer.is_authenticated(),
            can_edit: can_mutate(viewer, &post),
            post,
            comments,
        })
    }

    pub async fn form_choices(&self) -> Result<FormChoices, DomainError> {
        Ok(FormChoices {
            categories: self.categories.list_published().await?,
            locations: self.locations.list_published().await?,
        })
    }

    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        author_id: Uuid,
        request: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let mut errors = FormErrors::new();
        let title = forms::required_text(&mut errors, "title", &request.title, Some(TITLE_MAX));
        let text = forms::required_text(&mut errors, "text", &request.text, None);
        let pub_date = forms::optional_datetime(&mut errors, "pub_date", request.pub_date.as_deref());
        self.check_category(&mut errors, request.category_id).await?;
        self.check_location(&mut errors, request.location_id).await?;
        let image = forms::image_reference(&mut errors, request.image);
        errors.into_result()?;

        let mut post = Post::new(author_id, title, text, pub_date.unwrap_or_else(Utc::now));
        post.is_published = request.is_published;
        post.category_id = request.category_id;
        post.location_id = request.location_id;
        post.image = image;

        self.posts.create(post).await
    }

    /// Pre-filled edit form; only the author gets it.
    pub async fn edit_form(
        &self,
        viewer: Viewer,
        post_id: Uuid,
    ) -> Result<Guarded<PostEntry>, DomainError> {
        let entry = self
            .posts
            .find_entry(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;
        if !can_mutate(viewer, &entry) {
            return Ok(Guarded::NotOwner);
        }
        Ok(Guarded::Owner(entry))
    }

    /// Applies the submitted fields; absent fields keep their value.
    #[instrument(skip(self, update))]
    pub async fn update_post(
        &self,
        viewer: Viewer,
        post_id: Uuid,
        update: UpdatePostRequest,
    ) -> Result<Guarded<Post>, DomainError> {
        let mut post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;
        if !can_mutate(viewer, &post) {
            return Ok(Guarded::NotOwner);
        }

        let mut errors = FormErrors::new();
        if let Some(title) = update.title {
            post.title = forms::required_text(&mut errors, "title", &title, Some(TITLE_MAX));
        }
        if let Some(text) = update.text {
            post.text = forms::required_text(&mut errors, "text", &text, None);
        }
        if let Some(raw) = update.pub_date {
            match forms::optional_datetime(&mut errors, "pub_date", Some(&raw)) {
                Some(pub_date) => post.pub_date = pub_date,
                None if raw.trim().is_empty() => errors.add("pub_date", forms::REQUIRED),
                None => {}
            }
        }
        if let Some(category_id) = update.category_id {
            self.check_category(&mut errors, category_id).await?;
            post.category_id = category_id;
        }
        if let Some(location_id) = update.location_id {
            self.check_location(&mut errors, location_id).await?;
            post.location_id = location_id;
        }
        if let Some(is_published) = update.is_published {
            post.is_published = is_published;
        }
        if let Some(image) = update.image {
            post.image = forms::image_reference(&mut errors, image);
        }
        errors.into_result()?;

        let saved = self
            .posts
            .update(&post)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;
        Ok(Guarded::Owner(saved))
    }

    pub async fn delete_confirmation(
        &self,
        viewer: Viewer,
        post_id: Uuid,
    ) -> Result<Guarded<PostEntry>, DomainError> {
        self.edit_form(viewer, post_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, viewer: Viewer, post_id: Uuid) -> Result<Guarded<()>, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;
        if !can_mutate(viewer, &post) {
            return Ok(Guarded::NotOwner);
        }
        if !self.posts.delete(post_id).await? {
            return Err(DomainError::PostNotFound(post_id));
        }
        Ok(Guarded::Owner(()))
    }

    async fn check_category(
        &self,
        errors: &mut FormErrors,
        category_id: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let Some(id) = category_id else {
            return Ok(());
        };
        let offered = self
            .categories
            .find_by_id(id)
            .await?
            .is_some_and(|c| c.is_published);
        if !offered {
            errors.add("category", INVALID_CHOICE);
        }
        Ok(())
    }

    async fn check_location(
        &self,
        errors: &mut FormErrors,
        location_id: Option<Uuid>,
    ) -> Result<(), DomainError> {
        let Some(id) = location_id else {
            return Ok(());
        };
        let offered = self
            .locations
            .find_by_id(id)
            .await?
            .is_some_and(|l| l.is_published);
        if !offered {
            errors.add("location", INVALID_CHOICE);
        }
        Ok(())
    }
}

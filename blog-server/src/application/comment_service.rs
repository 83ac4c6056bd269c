use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::application::Guarded;
use crate::application::forms;
use crate::application::post_service::load_visible;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::comment::Comment;
use crate::domain::error::{DomainError, FormErrors};
use crate::domain::visibility::{Viewer, can_mutate};
use crate::presentation::dto::CommentRequest;

#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    #[instrument(skip(self, request))]
    pub async fn add_comment(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        request: CommentRequest,
    ) -> Result<Comment, DomainError> {
        load_visible(self.posts.as_ref(), Viewer::User(author_id), post_id).await?;
        let text = clean_text(&request)?;
        self.comments
            .create(Comment::new(post_id, author_id, text))
            .await
    }

    /// The comment, if the viewer wrote it. Also backs the delete
    /// confirmation page.
    pub async fn owned_comment(
        &self,
        viewer: Viewer,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Guarded<Comment>, DomainError> {
        let comment = self.load(post_id, comment_id).await?;
        if !can_mutate(viewer, &comment) {
            return Ok(Guarded::NotOwner);
        }
        Ok(Guarded::Owner(comment))
    }

    #[instrument(skip(self, request))]
    pub async fn update_comment(
        &self,
        viewer: Viewer,
        post_id: Uuid,
        comment_id: Uuid,
        request: CommentRequest,
    ) -> Result<Guarded<Comment>, DomainError> {
        let comment = self.load(post_id, comment_id).await?;
        if !can_mutate(viewer, &comment) {
            return Ok(Guarded::NotOwner);
        }
        let text = clean_text(&request)?;
        let updated = self
            .comments
            .update_text(comment.id, &text)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;
        Ok(Guarded::Owner(updated))
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        viewer: Viewer,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Guarded<()>, DomainError> {
        let comment = self.load(post_id, comment_id).await?;
        if !can_mutate(viewer, &comment) {
            return Ok(Guarded::NotOwner);
        }
        if !self.comments.delete(comment.id).await? {
            return Err(DomainError::CommentNotFound(comment_id));
        }
        Ok(Guarded::Owner(()))
    }

    async fn load(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment, DomainError> {
        self.comments
            .find_in_post(post_id, comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))
    }
}

fn clean_text(request: &CommentRequest) -> Result<String, DomainError> {
    let mut errors = FormErrors::new();
    let text = forms::required_text(&mut errors, "text", &request.text, None);
    errors.into_result()?;
    Ok(text)
}

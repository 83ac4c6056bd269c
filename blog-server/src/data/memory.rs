//! In-process implementation of every repository, used by the tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::data::category_repository::CategoryRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::location_repository::LocationRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::category::{Category, CategoryRef};
use crate::domain::comment::{Comment, CommentEntry};
use crate::domain::error::DomainError;
use crate::domain::feed::FeedQuery;
use crate::domain::location::{Location, LocationRef};
use crate::domain::post::{Post, PostEntry};
use crate::domain::user::User;

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

impl State {
    fn entry(&self, post: &Post, with_comment_count: bool) -> PostEntry {
        let comment_count = with_comment_count.then(|| {
            self.comments
                .values()
                .filter(|c| c.post_id == post.id)
                .count() as i64
        });
        PostEntry {
            author_username: self
                .users
                .get(&post.author_id)
                .map(|u| u.username.clone())
                .unwrap_or_default(),
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id))
                .map(CategoryRef::from),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id))
                .map(LocationRef::from),
            comment_count,
            post: post.clone(),
        }
    }

    fn feed(&self, query: &FeedQuery) -> Vec<PostEntry> {
        let mut entries: Vec<PostEntry> = self
            .posts
            .values()
            .map(|p| self.entry(p, query.with_comment_count))
            .filter(|e| query.matches(e))
            .collect();
        entries.sort_by(|a, b| {
            b.post
                .pub_date
                .cmp(&a.post.pub_date)
                .then(b.post.created_at.cmp(&a.post.created_at))
                .then(a.post.id.cmp(&b.post.id))
        });
        entries
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store lock poisoned")
    }

    pub fn add_user(&self, username: &str) -> User {
        let user = User::new(
            username.to_string(),
            format!("{username}@example.com"),
            "not-a-hash".to_string(),
        );
        self.lock().users.insert(user.id, user.clone());
        user
    }

    pub fn add_category(&self, slug: &str, is_published: bool) -> Category {
        let mut category = Category::new(slug.to_uppercase(), format!("About {slug}"), slug.into());
        category.is_published = is_published;
        self.lock().categories.insert(category.id, category.clone());
        category
    }

    pub fn add_location(&self, name: &str, is_published: bool) -> Location {
        let mut location = Location::new(name.into());
        location.is_published = is_published;
        self.lock().locations.insert(location.id, location.clone());
        location
    }

    pub fn put_post(&self, post: Post) -> Post {
        self.lock().posts.insert(post.id, post.clone());
        post
    }

    pub fn put_comment(&self, comment: Comment) -> Comment {
        self.lock().comments.insert(comment.id, comment.clone());
        comment
    }

    pub fn post(&self, id: Uuid) -> Option<Post> {
        self.lock().posts.get(&id).cloned()
    }

    pub fn comment(&self, id: Uuid) -> Option<Comment> {
        self.lock().comments.get(&id).cloned()
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.lock().users.get(&id).cloned()
    }

    pub fn posts_by(&self, author_id: Uuid) -> Vec<Post> {
        self.lock()
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state.users.values().any(|u| u.username == user.username) {
            return Err(DomainError::UserAlreadyExists(user.username));
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn update_profile(&self, user: &User) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(DomainError::UserAlreadyExists(user.username.clone()));
        }
        match state.users.get_mut(&user.id) {
            Some(stored) => {
                stored.username = user.username.clone();
                stored.email = user.email.clone();
                stored.first_name = user.first_name.clone();
                stored.last_name = user.last_name.clone();
                Ok(stored.clone())
            }
            None => Err(DomainError::UserNotFound(user.username.clone())),
        }
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        Ok(self
            .lock()
            .categories
            .values()
            .find(|c| c.slug == slug && c.is_published)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, DomainError> {
        Ok(self.lock().categories.get(&id).cloned())
    }

    async fn list_published(&self) -> Result<Vec<Category>, DomainError> {
        let mut categories: Vec<Category> = self
            .lock()
            .categories
            .values()
            .filter(|c| c.is_published)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl LocationRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, DomainError> {
        Ok(self.lock().locations.get(&id).cloned())
    }

    async fn list_published(&self) -> Result<Vec<Location>, DomainError> {
        let mut locations: Vec<Location> = self
            .lock()
            .locations
            .values()
            .filter(|l| l.is_published)
            .cloned()
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        Ok(self.put_post(post))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self.post(id))
    }

    async fn find_entry(&self, id: Uuid) -> Result<Option<PostEntry>, DomainError> {
        let state = self.lock();
        Ok(state.posts.get(&id).map(|p| state.entry(p, true)))
    }

    async fn update(&self, post: &Post) -> Result<Option<Post>, DomainError> {
        let mut state = self.lock();
        Ok(state.posts.get_mut(&post.id).map(|stored| {
            let created_at = stored.created_at;
            let author_id = stored.author_id;
            *stored = post.clone();
            stored.created_at = created_at;
            stored.author_id = author_id;
            stored.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let removed = state.posts.remove(&id).is_some();
        state.comments.retain(|_, c| c.post_id != id);
        Ok(removed)
    }

    async fn count_feed(&self, query: &FeedQuery) -> Result<u64, DomainError> {
        Ok(self.lock().feed(query).len() as u64)
    }

    async fn list_feed(
        &self,
        query: &FeedQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostEntry>, DomainError> {
        Ok(self
            .lock()
            .feed(query)
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        Ok(self.put_comment(comment))
    }

    async fn find_in_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, DomainError> {
        Ok(self
            .comment(comment_id)
            .filter(|c| c.post_id == post_id))
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentEntry>, DomainError> {
        let state = self.lock();
        let mut entries: Vec<CommentEntry> = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .map(|c| CommentEntry {
                author_username: state
                    .users
                    .get(&c.author_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
                comment: c.clone(),
            })
            .collect();
        entries.sort_by(|a, b| {
            a.comment
                .created_at
                .cmp(&b.comment.created_at)
                .then(a.comment.id.cmp(&b.comment.id))
        });
        Ok(entries)
    }

    async fn update_text(
        &self,
        comment_id: Uuid,
        text: &str,
    ) -> Result<Option<Comment>, DomainError> {
        Ok(self.lock().comments.get_mut(&comment_id).map(|c| {
            c.text = text.to_string();
            c.clone()
        }))
    }

    async fn delete(&self, comment_id: Uuid) -> Result<bool, DomainError> {
        Ok(self.lock().comments.remove(&comment_id).is_some())
    }
}

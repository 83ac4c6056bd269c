//! Who may read a post and who may change posts and comments.
//!
//! Everything here is pure: callers pass the viewer and the clock
//! reading explicitly. A failed read check must be reported as "not
//! found", a failed mutate check as a redirect to the read-only page.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::post::{Post, PostEntry};

/// Identity making the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn id(self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(id),
        }
    }

    pub fn is_authenticated(self) -> bool {
        matches!(self, Viewer::User(_))
    }

    pub fn is(self, user_id: Uuid) -> bool {
        self.id() == Some(user_id)
    }
}

impl From<Option<Uuid>> for Viewer {
    fn from(id: Option<Uuid>) -> Self {
        id.map_or(Viewer::Anonymous, Viewer::User)
    }
}

/// Content owned by a single user.
pub trait Authored {
    fn author_id(&self) -> Uuid;
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Authored for PostEntry {
    fn author_id(&self) -> Uuid {
        self.post.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// Published, due, and not filed under a hidden category.
///
/// The location's published flag is deliberately not consulted.
pub fn is_publicly_visible(entry: &PostEntry, now: DateTime<Utc>) -> bool {
    entry.post.is_published
        && entry.post.pub_date <= now
        && entry.category.as_ref().is_none_or(|c| c.is_published)
}

pub fn can_view(viewer: Viewer, entry: &PostEntry, now: DateTime<Utc>) -> bool {
    is_publicly_visible(entry, now) || viewer.is(entry.post.author_id)
}

/// No staff override: only the author passes.
pub fn can_mutate<T: Authored + ?Sized>(viewer: Viewer, entity: &T) -> bool {
    viewer.is(entity.author_id())
}

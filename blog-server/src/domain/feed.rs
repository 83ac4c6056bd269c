//! Post listings: which rows belong to a feed.
//!
//! `FeedQuery` is a plain description; `PostRepository` turns it into
//! SQL. `matches` is the row-level reading of the same filter.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::post::PostEntry;
use crate::domain::visibility::{Viewer, is_publicly_visible};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    All,
    Category(Uuid),
    Author(Uuid),
}

#[derive(Debug, Clone, Copy)]
pub struct FeedQuery {
    pub scope: FeedScope,
    pub public_only: bool,
    pub with_comment_count: bool,
    pub now: DateTime<Utc>,
}

impl FeedQuery {
    pub fn index(now: DateTime<Utc>) -> Self {
        Self {
            scope: FeedScope::All,
            public_only: true,
            with_comment_count: true,
            now,
        }
    }

    pub fn category(category_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            scope: FeedScope::Category(category_id),
            public_only: true,
            with_comment_count: false,
            now,
        }
    }

    /// The owner sees drafts and scheduled posts on their own profile.
    pub fn profile(author_id: Uuid, viewer: Viewer, now: DateTime<Utc>) -> Self {
        Self {
            scope: FeedScope::Author(author_id),
            public_only: !viewer.is(author_id),
            with_comment_count: true,
            now,
        }
    }

    pub fn matches(&self, entry: &PostEntry) -> bool {
        let in_scope = match self.scope {
            FeedScope::All => true,
            FeedScope::Category(id) => entry.post.category_id == Some(id),
            FeedScope::Author(id) => entry.post.author_id == id,
        };
        in_scope && (!self.public_only || is_publicly_visible(entry, self.now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::Post;
    use chrono::Duration;

    fn draft(author: Uuid) -> PostEntry {
        let mut post = Post::new(author, "t".into(), "x".into(), Utc::now() - Duration::hours(1));
        post.is_published = false;
        PostEntry {
            post,
            author_username: "someone".into(),
            category: None,
            location: None,
            comment_count: None,
        }
    }

    #[test]
    fn owner_profile_includes_drafts() {
        let author = Uuid::new_v4();
        let entry = draft(author);
        let now = Utc::now();

        assert!(FeedQuery::profile(author, Viewer::User(author), now).matches(&entry));
        assert!(!FeedQuery::profile(author, Viewer::Anonymous, now).matches(&entry));
        assert!(!FeedQuery::profile(author, Viewer::User(Uuid::new_v4()), now).matches(&entry));
    }

    #[test]
    fn scope_filters_by_category_and_author() {
        let author = Uuid::new_v4();
        let mut entry = draft(author);
        entry.post.is_published = true;
        let category = Uuid::new_v4();
        entry.post.category_id = Some(category);
        let now = Utc::now();

        assert!(FeedQuery::index(now).matches(&entry));
        assert!(FeedQuery::category(category, now).matches(&entry));
        assert!(!FeedQuery::category(Uuid::new_v4(), now).matches(&entry));
        assert!(!FeedQuery::profile(Uuid::new_v4(), Viewer::Anonymous, now).matches(&entry));
    }
}

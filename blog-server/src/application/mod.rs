pub mod auth_service;
pub mod comment_service;
pub mod feed_service;
pub mod forms;
pub mod post_service;

/// Result of an ownership-gated operation.
///
/// `NotOwner` is not an error: the caller sends the viewer back to
/// the read-only page.
#[derive(Debug, PartialEq)]
pub enum Guarded<T> {
    Owner(T),
    NotOwner,
}


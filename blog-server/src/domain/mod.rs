pub mod category;
pub mod comment;
pub mod error;
pub mod feed;
pub mod location;
pub mod page;
pub mod post;
pub mod user;
pub mod visibility;

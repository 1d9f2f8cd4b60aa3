pub mod client;
pub mod error;
pub mod post;

pub use client::{SearchRequest, TwitterClient};
pub use error::TwitterError;
pub use post::RawPost;

use async_trait::async_trait;
use twitter::{RawPost, SearchRequest, TwitterClient, TwitterError};

/// The two remote operations the crawl needs: a page fetch and a
/// single-status lookup. Abstracted so the loop can be driven by a
/// scripted source in tests.
#[async_trait]
pub trait SearchApi {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawPost>, TwitterError>;
    async fn show(&self, id: &str) -> Result<RawPost, TwitterError>;
}

#[async_trait]
impl SearchApi for TwitterClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawPost>, TwitterError> {
        TwitterClient::search(self, request).await
    }

    async fn show(&self, id: &str) -> Result<RawPost, TwitterError> {
        TwitterClient::show(self, id).await
    }
}

use std::time::Duration;

use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, ClientBuilder, Response, StatusCode};

use crate::error::TwitterError;
use crate::post::{RawPost, SearchResponse};

static SEARCH_URL: &str = "https://api.twitter.com/1.1/search/tweets.json";
static SHOW_URL: &str = "https://api.twitter.com/1.1/statuses/show.json";

/// Parameters for one page of the search endpoint.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub lang: String,
    pub count: u32,
    /// Upper bound on returned ids; unset requests the most recent page.
    pub max_id: Option<u64>,
}

impl SearchRequest {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", self.query.clone()),
            ("lang", self.lang.clone()),
            ("count", self.count.to_string()),
            ("tweet_mode", "extended".to_string()),
        ];
        if let Some(id) = self.max_id {
            params.push(("max_id", id.to_string()));
        }
        params
    }
}

pub struct TwitterClient {
    client: Client,
}

impl TwitterClient {
    pub fn new(bearer: &str) -> TwitterClient {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {}", bearer).parse().unwrap());

        let client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        TwitterClient { client }
    }

    /// Fetches one page of search results, newest first. Empty when the
    /// query window is exhausted.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<RawPost>, TwitterError> {
        let resp = self
            .client
            .get(SEARCH_URL)
            .query(&request.params())
            .send()
            .await?;
        let resp = check_response(resp).await?;

        Ok(resp.json::<SearchResponse>().await?.statuses)
    }

    /// Fetches a single status by id in extended tweet mode.
    pub async fn show(&self, id: &str) -> Result<RawPost, TwitterError> {
        let params = [("id", id), ("tweet_mode", "extended")];
        let resp = self.client.get(SHOW_URL).query(&params).send().await?;
        let resp = check_response(resp).await?;

        Ok(resp.json::<RawPost>().await?)
    }
}

async fn check_response(resp: Response) -> Result<Response, TwitterError> {
    match resp.status() {
        StatusCode::TOO_MANY_REQUESTS => Err(TwitterError::RateLimited),
        status if !status.is_success() => {
            let message = resp.text().await.unwrap_or_default();
            Err(TwitterError::Api {
                status: status.as_u16(),
                message,
            })
        }
        _ => Ok(resp),
    }
}

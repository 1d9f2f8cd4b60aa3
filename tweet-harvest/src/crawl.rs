use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error};
use twitter::{SearchRequest, TwitterError};

use crate::api::SearchApi;
use crate::reply;
use crate::sink::Sink;
use crate::tweet::CanonicalTweet;

pub struct CrawlParams {
    /// Full query text, date window and retweet filter included.
    pub query: String,
    pub lang: String,
    pub page_size: u32,
    /// Upper bound on posts fetched across all pages.
    pub max_posts: u64,
    /// Minutes to block when the API reports a rate limit.
    pub rate_limit_window: u64,
}

/// Drives the search pagination for one keyword phrase and persists every
/// new post. Returns the number of posts persisted.
///
/// Pages are fetched in strictly decreasing id order; the cursor for the
/// next page is one less than the oldest id seen so far. A rate limit
/// blocks for the configured window and retries the same cursor without
/// counting toward the post budget. Any other API error is logged and the
/// loop re-checks its bound with the cursor unchanged.
pub async fn run(
    api: &impl SearchApi,
    sink: &mut (dyn Sink + Send),
    params: &CrawlParams,
) -> Result<u64> {
    let mut cursor: Option<u64> = None;
    let mut fetched: u64 = 0;
    let mut persisted: u64 = 0;
    let mut seen = HashSet::new();

    while fetched < params.max_posts {
        let request = SearchRequest {
            query: params.query.clone(),
            lang: params.lang.clone(),
            count: params.page_size,
            max_id: cursor,
        };

        let posts = match api.search(&request).await {
            Ok(posts) => posts,
            Err(TwitterError::RateLimited) => {
                debug!(
                    "rate limited, backing off {} minutes",
                    params.rate_limit_window
                );
                tokio::time::sleep(Duration::from_secs(params.rate_limit_window * 60)).await;
                continue;
            }
            Err(err) => {
                error!("search failed for query [{}]: {}", params.query, err);
                continue;
            }
        };

        if posts.is_empty() {
            error!(
                "no tweets found, language: {} query: [{}]",
                params.lang, params.query
            );
            break;
        }

        if let Some(oldest) = posts.iter().map(|p| p.id).min() {
            cursor = Some(oldest.saturating_sub(1));
        }
        fetched += posts.len() as u64;

        for raw in &posts {
            if raw.best_text().is_empty() {
                continue;
            }
            if !seen.insert(raw.id) {
                continue;
            }

            let mut tweet = CanonicalTweet::from(raw);
            if tweet.in_reply_to_status_id.is_some() && tweet.in_reply_to_user_id.is_some() {
                reply::attach_reply_text(api, &mut tweet).await;
            }
            sink.persist(&tweet).await?;
            persisted += 1;
        }
    }

    Ok(persisted)
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::time::Instant;
    use twitter::RawPost;

    use super::*;

    /// Pops one scripted response per search call and records the cursor
    /// of every request. Exhausted scripts return empty pages.
    struct ScriptedApi {
        pages: Mutex<VecDeque<Result<Vec<RawPost>, TwitterError>>>,
        cursors: Mutex<Vec<Option<u64>>>,
        parent: Option<RawPost>,
    }

    impl ScriptedApi {
        fn new(pages: Vec<Result<Vec<RawPost>, TwitterError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                cursors: Mutex::new(vec![]),
                parent: None,
            }
        }

        fn cursors(&self) -> Vec<Option<u64>> {
            self.cursors.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchApi for ScriptedApi {
        async fn search(&self, request: &SearchRequest) -> Result<Vec<RawPost>, TwitterError> {
            self.cursors.lock().unwrap().push(request.max_id);
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![]))
        }

        async fn show(&self, _id: &str) -> Result<RawPost, TwitterError> {
            self.parent.clone().ok_or(TwitterError::Api {
                status: 404,
                message: "No status found".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct MemSink {
        tweets: Vec<CanonicalTweet>,
    }

    #[async_trait]
    impl Sink for MemSink {
        async fn persist(&mut self, tweet: &CanonicalTweet) -> Result<()> {
            self.tweets.push(tweet.clone());
            Ok(())
        }
    }

    fn post(id: u64) -> RawPost {
        serde_json::from_value(serde_json::json!({
            "created_at": "x",
            "id": id,
            "id_str": id.to_string(),
            "full_text": format!("post {}", id)
        }))
        .unwrap()
    }

    fn page(ids: std::ops::RangeInclusive<u64>) -> Vec<RawPost> {
        // Newest first, as the API returns them.
        ids.rev().map(post).collect()
    }

    fn params(max_posts: u64) -> CrawlParams {
        CrawlParams {
            query: "vaccine -filter:retweets".to_string(),
            lang: "en".to_string(),
            page_size: 25,
            max_posts,
            rate_limit_window: 15,
        }
    }

    #[tokio::test]
    async fn empty_first_page_terminates_with_zero() {
        let api = ScriptedApi::new(vec![Ok(vec![])]);
        let mut sink = MemSink::default();

        let total = run(&api, &mut sink, &params(50)).await.unwrap();

        assert_eq!(total, 0);
        assert_eq!(api.cursors(), vec![None]);
    }

    #[tokio::test]
    async fn two_pages_hit_the_budget() {
        // 25 posts per page, max 50: exactly two fetches, second one
        // anchored at the oldest id of page one minus one.
        let api = ScriptedApi::new(vec![Ok(page(976..=1000)), Ok(page(951..=975))]);
        let mut sink = MemSink::default();

        let total = run(&api, &mut sink, &params(50)).await.unwrap();

        assert_eq!(total, 50);
        assert_eq!(api.cursors(), vec![None, Some(975)]);
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limit_sleeps_once_and_retries_same_cursor() {
        let api = ScriptedApi::new(vec![
            Err(TwitterError::RateLimited),
            Ok(page(976..=1000)),
            Ok(vec![]),
        ]);
        let mut sink = MemSink::default();
        let started = Instant::now();

        let total = run(&api, &mut sink, &params(50)).await.unwrap();

        assert_eq!(total, 25);
        // Retry reuses the unset cursor; the page after it advances.
        assert_eq!(api.cursors(), vec![None, None, Some(975)]);
        assert!(started.elapsed() >= Duration::from_secs(15 * 60));
    }

    #[tokio::test]
    async fn generic_error_skips_the_page_without_advancing() {
        let api = ScriptedApi::new(vec![
            Err(TwitterError::Api {
                status: 500,
                message: "Internal error".to_string(),
            }),
            Ok(page(976..=1000)),
            Ok(vec![]),
        ]);
        let mut sink = MemSink::default();

        let total = run(&api, &mut sink, &params(100)).await.unwrap();

        assert_eq!(total, 25);
        assert_eq!(api.cursors(), vec![None, None, Some(975)]);
    }

    #[tokio::test]
    async fn duplicate_ids_are_persisted_once() {
        let mut overlap = page(976..=1000);
        overlap.extend(page(990..=1000));
        let api = ScriptedApi::new(vec![Ok(overlap), Ok(vec![])]);
        let mut sink = MemSink::default();

        let total = run(&api, &mut sink, &params(100)).await.unwrap();

        assert_eq!(total, 25);
        assert_eq!(sink.tweets.len(), 25);
    }

    #[tokio::test]
    async fn posts_without_text_are_skipped() {
        let mut posts = page(999..=1000);
        posts.push(
            serde_json::from_value(serde_json::json!({
                "created_at": "x",
                "id": 998,
                "id_str": "998"
            }))
            .unwrap(),
        );
        let api = ScriptedApi::new(vec![Ok(posts), Ok(vec![])]);
        let mut sink = MemSink::default();

        let total = run(&api, &mut sink, &params(100)).await.unwrap();

        assert_eq!(total, 2);
        // The empty post still moves the cursor.
        assert_eq!(api.cursors(), vec![None, Some(997)]);
    }

    #[tokio::test]
    async fn replies_are_enriched_with_the_parent_text() {
        let reply: RawPost = serde_json::from_value(serde_json::json!({
            "created_at": "x",
            "id": 1000,
            "id_str": "1000",
            "full_text": "a reply",
            "in_reply_to_status_id": 900u64,
            "in_reply_to_status_id_str": "900",
            "in_reply_to_user_id": 9u64
        }))
        .unwrap();
        let mut api = ScriptedApi::new(vec![Ok(vec![reply]), Ok(vec![])]);
        api.parent = Some(post(900));
        let mut sink = MemSink::default();

        run(&api, &mut sink, &params(100)).await.unwrap();

        assert_eq!(sink.tweets[0].reply_text.as_deref(), Some("post 900"));
    }
}

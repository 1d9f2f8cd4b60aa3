use chrono::{Duration, NaiveDate};

/// One keyword search, bounded by an explicit or implicit date window.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub keyword: String,
    pub lang: String,
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    /// Suppress the implicit window when no explicit range is given.
    pub unbounded: bool,
    pub include_retweets: bool,
    pub page_size: u32,
    pub max_posts: u64,
}

impl QuerySpec {
    /// Full query text sent to the search endpoint. With neither `since`
    /// nor `until` set, a window of `window_days` ending at `today` is
    /// substituted unless `unbounded` is set. Retweets are filtered out
    /// unless explicitly requested.
    pub fn query_text(&self, today: NaiveDate, window_days: i64) -> String {
        let mut query = self.keyword.clone();
        match (self.since, self.until) {
            (None, None) => {
                if !self.unbounded {
                    let from = today - Duration::days(window_days);
                    query.push_str(&format!(
                        " since:{} until:{}",
                        from.format("%Y-%m-%d"),
                        today.format("%Y-%m-%d")
                    ));
                }
            }
            (since, until) => {
                if let Some(since) = since {
                    query.push_str(&format!(" since:{}", since.format("%Y-%m-%d")));
                }
                if let Some(until) = until {
                    query.push_str(&format!(" until:{}", until.format("%Y-%m-%d")));
                }
            }
        }
        if !self.include_retweets {
            query.push_str(" -filter:retweets");
        }
        query
    }
}

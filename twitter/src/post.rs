use serde::Deserialize;
use serde_json::Value;

/// One status as returned by the v1.1 API in extended tweet mode.
///
/// Only `id`, `id_str` and `created_at` are guaranteed by the API; every
/// other field may be missing depending on the status and the endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct RawPost {
    pub created_at: String,
    pub id: u64,
    pub id_str: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default)]
    pub in_reply_to_status_id: Option<u64>,
    #[serde(default)]
    pub in_reply_to_status_id_str: Option<String>,
    #[serde(default)]
    pub in_reply_to_user_id: Option<u64>,
    #[serde(default)]
    pub in_reply_to_user_id_str: Option<String>,
    #[serde(default)]
    pub in_reply_to_screen_name: Option<String>,
    #[serde(default)]
    pub user: Option<RawUser>,
    #[serde(default)]
    pub coordinates: Option<Value>,
    #[serde(default)]
    pub place: Option<RawPlace>,
    #[serde(default)]
    pub is_quote_status: Option<bool>,
    #[serde(default)]
    pub quoted_status: Option<Box<RawPost>>,
    #[serde(default)]
    pub quoted_status_id_str: Option<String>,
    #[serde(default)]
    pub quote_count: Option<u64>,
    #[serde(default)]
    pub retweet_count: Option<u64>,
    #[serde(default)]
    pub favorite_count: Option<u64>,
    /// Hashtags, urls, mentions and the like, kept as raw JSON so
    /// downstream projection can pick single entity groups out of it.
    #[serde(default)]
    pub entities: Option<Value>,
    #[serde(default)]
    pub retweeted: bool,
    #[serde(default)]
    pub possibly_sensitive: bool,
    #[serde(default)]
    pub lang: Option<String>,
}

impl RawPost {
    /// Extended text when the API returned it non-empty, else the
    /// truncated form, else empty.
    pub fn best_text(&self) -> &str {
        match &self.full_text {
            Some(t) if !t.is_empty() => t,
            _ => self.text.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawUser {
    pub id: u64,
    pub id_str: String,
    pub name: String,
    pub screen_name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawPlace {
    pub full_name: String,
    pub country: String,
}

/// Envelope of the search endpoint.
#[derive(Deserialize, Debug)]
pub struct SearchResponse {
    pub statuses: Vec<RawPost>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserialize_minimal_status() {
        let post: RawPost = serde_json::from_str(
            r#"{
                "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                "id": 1050118621198921728,
                "id_str": "1050118621198921728",
                "text": "short form"
            }"#,
        )
        .unwrap();

        assert_eq!(post.id, 1050118621198921728);
        assert_eq!(post.best_text(), "short form");
        assert!(!post.truncated);
        assert!(!post.retweeted);
        assert!(post.in_reply_to_status_id.is_none());
        assert!(post.entities.is_none());
    }

    #[test]
    fn best_text_prefers_extended_form() {
        let post: RawPost = serde_json::from_str(
            r#"{
                "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                "id": 1,
                "id_str": "1",
                "text": "truncated…",
                "full_text": "the whole extended text"
            }"#,
        )
        .unwrap();

        assert_eq!(post.best_text(), "the whole extended text");
    }

    #[test]
    fn search_envelope() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{"statuses": [{"created_at": "x", "id": 2, "id_str": "2"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.statuses.len(), 1);
        assert_eq!(resp.statuses[0].best_text(), "");
    }
}

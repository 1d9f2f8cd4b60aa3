use chrono::DateTime;
use serde_json::Value;
use twitter::RawPost;

static API_CREATED_AT: &str = "%a %b %d %H:%M:%S %z %Y";
static CANONICAL_TIME: &str = "%Y-%m-%d %H:%M:%S";

/// Stable-shaped record derived one-to-one from a raw API status.
///
/// Every optional field carries a defined absence value (`None`, `false`
/// or empty) instead of being omitted, so projection never probes for
/// existence beyond a missing container field.
#[derive(Debug, Clone, Default)]
pub struct CanonicalTweet {
    /// `%Y-%m-%d %H:%M:%S`; the raw string is kept when unparseable.
    pub created_at: String,
    pub id: u64,
    pub id_str: String,
    /// Extended form preferred over the truncated form.
    pub text: String,
    pub source: Option<String>,
    pub truncated: bool,
    pub in_reply_to_status_id: Option<u64>,
    pub in_reply_to_status_id_str: Option<String>,
    pub in_reply_to_user_id: Option<u64>,
    pub in_reply_to_user_id_str: Option<String>,
    pub in_reply_to_screen_name: Option<String>,
    /// Author id_str.
    pub user: Option<String>,
    /// Author display name.
    pub name: Option<String>,
    /// Author screen name.
    pub username: Option<String>,
    pub coordinates: Option<Value>,
    /// `"<full_name>, <country>"` when the status carries a place.
    pub place: Option<String>,
    pub is_quote_status: Option<bool>,
    /// Text of the quoted status, extended form preferred; never a nested
    /// object.
    pub quoted_status: Option<String>,
    pub quoted_status_id_str: Option<String>,
    pub quote_count: Option<u64>,
    pub retweet_count: Option<u64>,
    pub favorite_count: Option<u64>,
    pub entities: Option<Value>,
    pub retweeted: bool,
    pub possibly_sensitive: bool,
    pub lang: Option<String>,
    /// Parent status text, attached after construction by reply
    /// resolution. Absent for non-replies and for replies whose parent
    /// could not be fetched.
    pub reply_text: Option<String>,
}

impl From<&RawPost> for CanonicalTweet {
    fn from(raw: &RawPost) -> Self {
        Self {
            created_at: format_created_at(&raw.created_at),
            id: raw.id,
            id_str: raw.id_str.clone(),
            text: raw.best_text().to_string(),
            source: raw.source.clone(),
            truncated: raw.truncated,
            in_reply_to_status_id: raw.in_reply_to_status_id,
            in_reply_to_status_id_str: raw.in_reply_to_status_id_str.clone(),
            in_reply_to_user_id: raw.in_reply_to_user_id,
            in_reply_to_user_id_str: raw.in_reply_to_user_id_str.clone(),
            in_reply_to_screen_name: raw.in_reply_to_screen_name.clone(),
            user: raw.user.as_ref().map(|u| u.id_str.clone()),
            name: raw.user.as_ref().map(|u| u.name.clone()),
            username: raw.user.as_ref().map(|u| u.screen_name.clone()),
            coordinates: raw.coordinates.clone(),
            place: raw
                .place
                .as_ref()
                .map(|p| format!("{}, {}", p.full_name, p.country)),
            is_quote_status: raw.is_quote_status,
            quoted_status: raw.quoted_status.as_ref().map(|q| q.best_text().to_string()),
            quoted_status_id_str: raw.quoted_status_id_str.clone(),
            quote_count: raw.quote_count,
            retweet_count: raw.retweet_count,
            favorite_count: raw.favorite_count,
            entities: raw.entities.clone(),
            retweeted: raw.retweeted,
            possibly_sensitive: raw.possibly_sensitive,
            lang: raw.lang.clone(),
            reply_text: None,
        }
    }
}

fn format_created_at(raw: &str) -> String {
    DateTime::parse_from_str(raw, API_CREATED_AT)
        .map(|d| d.format(CANONICAL_TIME).to_string())
        .unwrap_or_else(|_| raw.to_string())
}

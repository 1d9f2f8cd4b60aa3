use tracing::debug;

use crate::api::SearchApi;
use crate::tweet::CanonicalTweet;

/// Best-effort fetch of the parent status text for a reply.
///
/// Only acts when the tweet carries both a reply-status id and a
/// reply-user id. Any failure (deleted parent, protected author, rate
/// limit) leaves `reply_text` unset; enrichment never fails the crawl.
pub async fn attach_reply_text<A: SearchApi + ?Sized>(api: &A, tweet: &mut CanonicalTweet) {
    if tweet.in_reply_to_status_id.is_none() || tweet.in_reply_to_user_id.is_none() {
        return;
    }
    let Some(parent_id) = tweet.in_reply_to_status_id_str.clone() else {
        return;
    };

    match api.show(&parent_id).await {
        Ok(parent) => tweet.reply_text = Some(parent.best_text().to_string()),
        Err(err) => debug!("reply lookup for {} failed: {}", parent_id, err),
    }
}

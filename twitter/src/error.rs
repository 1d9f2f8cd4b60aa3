use thiserror::Error;

#[derive(Debug, Error)]
pub enum TwitterError {
    /// HTTP 429 from the API. The caller is expected to back off and retry
    /// the same request.
    #[error("rate limited by twitter")]
    RateLimited,

    #[error("twitter api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

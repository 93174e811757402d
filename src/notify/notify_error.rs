use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Webhook returned HTTP {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("Still rate limited after {0} attempts")]
    RateLimited(u32),
}

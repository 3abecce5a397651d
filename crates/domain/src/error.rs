use thiserror::Error;

/// Every failure the feed can observe, from transport or from the server.
///
/// None of these are fatal: the originating action can always be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("transient failure: {0}")]
    Transient(String),
}

impl FeedError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FeedError::Transient(_))
    }
}

pub type FeedResult<T> = Result<T, FeedError>;

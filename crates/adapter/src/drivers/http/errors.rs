use domain::FeedError;
use reqwest::StatusCode;

pub fn status_error(status: StatusCode, body: String) -> FeedError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body.trim())
    };
    match status {
        StatusCode::NOT_FOUND => FeedError::NotFound(detail),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FeedError::Unauthorized(detail),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            FeedError::InvalidArgument(detail)
        }
        StatusCode::CONFLICT => FeedError::Conflict(detail),
        _ => FeedError::Transient(detail),
    }
}

pub fn transport_error(err: reqwest::Error) -> FeedError {
    FeedError::Transient(format!("request failed: {}", err))
}

pub fn decode_error(err: reqwest::Error) -> FeedError {
    FeedError::Transient(format!("invalid response body: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_onto_the_taxonomy() {
        let kind = |code: u16| status_error(StatusCode::from_u16(code).unwrap(), String::new());
        assert!(matches!(kind(404), FeedError::NotFound(_)));
        assert!(matches!(kind(401), FeedError::Unauthorized(_)));
        assert!(matches!(kind(403), FeedError::Unauthorized(_)));
        assert!(matches!(kind(400), FeedError::InvalidArgument(_)));
        assert!(matches!(kind(422), FeedError::InvalidArgument(_)));
        assert!(matches!(kind(409), FeedError::Conflict(_)));
        assert!(kind(503).is_retryable());
    }
}

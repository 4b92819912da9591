use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Failures raised by the language-model generation client. Each variant maps
/// to a distinct user-facing message so the caller can tell quota problems
/// from key problems from transient load.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("language model authentication failed")]
    AuthFailed,

    #[error("language model quota exceeded")]
    QuotaExceeded,

    #[error("language model rate limit exceeded")]
    RateLimited,

    #[error("language model returned an unusable itinerary: {0}")]
    MalformedResponse(String),

    #[error("language model request failed: {0}")]
    Upstream(String),
}

impl GenerationError {
    /// Classify a provider error body or message by its content. Providers
    /// report quota exhaustion through a 429 with a distinctive message, so
    /// the quota check runs before the rate-limit check.
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("exceeded your current quota") || lowered.contains("insufficient_quota")
        {
            GenerationError::QuotaExceeded
        } else if lowered.contains("401")
            || lowered.contains("authentication")
            || lowered.contains("invalid api key")
            || lowered.contains("incorrect api key")
        {
            GenerationError::AuthFailed
        } else if lowered.contains("rate limit") {
            GenerationError::RateLimited
        } else {
            GenerationError::Upstream(message.to_string())
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::AuthFailed => "auth_failed",
            GenerationError::QuotaExceeded => "quota_exceeded",
            GenerationError::RateLimited => "rate_limited",
            GenerationError::MalformedResponse(_) => "malformed_response",
            GenerationError::Upstream(_) => "generation_failed",
        }
    }

    /// User-facing message with a remediation hint.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::AuthFailed => {
                "Language model authentication failed. Check that the API key is valid and has \
                 the correct permissions."
                    .to_string()
            }
            GenerationError::QuotaExceeded => {
                "The language model API key has exceeded its usage quota. Check the provider \
                 billing and usage limits."
                    .to_string()
            }
            GenerationError::RateLimited => {
                "Too many requests to the language model API. Wait a moment and try again."
                    .to_string()
            }
            GenerationError::MalformedResponse(_) => {
                "The language model returned an unusable itinerary. Try planning the trip again."
                    .to_string()
            }
            GenerationError::Upstream(message) => message.clone(),
        }
    }
}

/// Failures raised by the maps provider adapter.
#[derive(Error, Debug)]
pub enum MapsError {
    #[error("maps request denied: {0}")]
    RequestDenied(String),

    #[error("invalid maps request: {0}")]
    InvalidRequest(String),

    #[error("no results found for: {0}")]
    NotFound(String),

    #[error("maps request failed: {0}")]
    Upstream(String),
}

impl MapsError {
    pub fn kind(&self) -> &'static str {
        match self {
            MapsError::RequestDenied(_) => "maps_request_denied",
            MapsError::InvalidRequest(_) => "maps_invalid_request",
            MapsError::NotFound(_) => "place_not_found",
            MapsError::Upstream(_) => "maps_error",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            MapsError::RequestDenied(_) => {
                "Maps request denied. Verify the maps server API key is valid, has billing \
                 enabled, and allows the Places, Geocoding, and Routes APIs."
                    .to_string()
            }
            MapsError::InvalidRequest(message) => message.clone(),
            MapsError::NotFound(query) => format!("No details found for: {}", query),
            MapsError::Upstream(message) => message.clone(),
        }
    }
}

/// Top-level error for HTTP handlers. Maps every failure to a status code and
/// a `{"error": code, "message": hint}` body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Maps(#[from] MapsError),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::InvalidInput(_) => "invalid_request",
            ApiError::Generation(err) => err.kind(),
            ApiError::Maps(err) => err.kind(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::NotFound(_) | ApiError::InvalidInput(_) => self.to_string(),
            ApiError::Generation(err) => err.user_message(),
            ApiError::Maps(err) => err.user_message(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Generation(GenerationError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Generation(_) => StatusCode::BAD_GATEWAY,
            ApiError::Maps(MapsError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Maps(MapsError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Maps(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.code(),
            "message": self.message(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_message_classifies_as_quota_exceeded() {
        let err = GenerationError::classify(
            "You exceeded your current quota, please check your plan and billing details.",
        );
        assert!(matches!(err, GenerationError::QuotaExceeded));
        assert_eq!(err.kind(), "quota_exceeded");
    }

    #[test]
    fn auth_message_classifies_as_auth_failed() {
        assert!(matches!(
            GenerationError::classify("Incorrect API key provided"),
            GenerationError::AuthFailed
        ));
        assert!(matches!(
            GenerationError::classify("HTTP 401 authentication error"),
            GenerationError::AuthFailed
        ));
    }

    #[test]
    fn rate_limit_message_classifies_as_rate_limited() {
        assert!(matches!(
            GenerationError::classify("Rate limit reached for gpt-4o"),
            GenerationError::RateLimited
        ));
    }

    #[test]
    fn unknown_message_classifies_as_upstream() {
        let err = GenerationError::classify("connection reset by peer");
        assert!(matches!(err, GenerationError::Upstream(_)));
        assert_eq!(err.kind(), "generation_failed");
    }

    #[test]
    fn quota_wins_over_rate_limit_wording() {
        // Quota exhaustion arrives as a 429 whose body mentions both.
        let err = GenerationError::classify(
            "Rate limit: you exceeded your current quota for this month",
        );
        assert!(matches!(err, GenerationError::QuotaExceeded));
    }

    #[test]
    fn api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("trip abc".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidInput("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Generation(GenerationError::RateLimited).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Generation(GenerationError::QuotaExceeded).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Maps(MapsError::NotFound("x".into())).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn distinct_user_messages_per_generation_kind() {
        let quota = GenerationError::QuotaExceeded.user_message();
        let auth = GenerationError::AuthFailed.user_message();
        let rate = GenerationError::RateLimited.user_message();
        assert!(quota.contains("quota"));
        assert!(auth.contains("API key"));
        assert!(rate.contains("again"));
        assert_ne!(quota, auth);
        assert_ne!(auth, rate);
    }
}

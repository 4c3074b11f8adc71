//! Fetch error types.

use reqwest::StatusCode;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error returned by a single marketplace request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Token rejected (401) or lacking access to the listing (403).
    #[error("Authorization failed (HTTP {status})")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
    },

    /// Listing does not exist (404).
    #[error("Listing not found")]
    NotFound,

    /// Rate limited by the marketplace (429).
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds suggested by the `Retry-After` header, if any.
        retry_after: Option<u64>,
    },

    /// Any other non-success status.
    #[error("Unexpected status code: {0}")]
    Status(u16),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Maps a non-success HTTP status to an error.
    pub fn from_status(status: StatusCode, retry_after: Option<u64>) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized {
                status: status.as_u16(),
            },
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited { retry_after },
            other => Self::Status(other.as_u16()),
        }
    }

    /// Classifies the error for retry decisions.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Unauthorized { .. } => FailureKind::Unauthorized,
            Self::NotFound => FailureKind::NotFound,
            Self::RateLimited { .. } => FailureKind::RateLimited,
            Self::Status(_) | Self::Http(_) | Self::Json(_) => FailureKind::Other,
        }
    }
}

// ============================================================================
// Failure Kind
// ============================================================================

/// Coarse classification of a failed request.
///
/// Only [`FailureKind::RateLimited`] is transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// 401 or 403.
    Unauthorized,
    /// 404.
    NotFound,
    /// 429.
    RateLimited,
    /// Network, server, or decode failure.
    Other,
}

impl FailureKind {
    /// Returns true if waiting may resolve the failure.
    pub fn is_transient(self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Header value could not be encoded.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let kind = |code: u16| {
            FetchError::from_status(StatusCode::from_u16(code).unwrap(), None).kind()
        };

        assert_eq!(kind(401), FailureKind::Unauthorized);
        assert_eq!(kind(403), FailureKind::Unauthorized);
        assert_eq!(kind(404), FailureKind::NotFound);
        assert_eq!(kind(429), FailureKind::RateLimited);
        assert_eq!(kind(400), FailureKind::Other);
        assert_eq!(kind(500), FailureKind::Other);
        assert_eq!(kind(503), FailureKind::Other);
    }

    #[test]
    fn test_only_rate_limit_is_transient() {
        assert!(FailureKind::RateLimited.is_transient());
        assert!(!FailureKind::NotFound.is_transient());
        assert!(!FailureKind::Unauthorized.is_transient());
        assert!(!FailureKind::Other.is_transient());
    }

    #[test]
    fn test_retry_after_is_kept() {
        let err = FetchError::from_status(StatusCode::TOO_MANY_REQUESTS, Some(12));
        assert!(matches!(err, FetchError::RateLimited { retry_after: Some(12) }));
    }
}

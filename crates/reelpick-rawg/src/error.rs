//! Error types for the RAWG client.

use thiserror::Error;

/// Errors raised by [`crate::RawgClient`].
#[derive(Debug, Error)]
pub enum RawgError {
    /// No usable API key is configured; nothing was sent.
    #[error("rawg api key is not configured")]
    MissingApiKey,
    /// The HTTP client could not be constructed.
    #[error("failed to build http client")]
    ClientBuild {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// An endpoint URL could not be formed from the base URL.
    #[error("invalid rawg endpoint")]
    InvalidEndpoint {
        /// Path that failed to resolve.
        path: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// The request could not be sent or the connection failed.
    #[error("rawg request failed")]
    Request {
        /// Endpoint path.
        endpoint: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// The provider answered with a non-success status.
    #[error("rawg returned an error status")]
    Status {
        /// Endpoint path.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Provider message or body excerpt.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("rawg response could not be decoded")]
    Decode {
        /// Endpoint path.
        endpoint: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

impl RawgError {
    /// Human-readable detail naming the endpoint and provider message.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Status {
                endpoint,
                status,
                message,
            } => format!("{endpoint} returned {status}: {message}"),
            Self::Request { endpoint, .. } | Self::Decode { endpoint, .. } => {
                format!("{self} ({endpoint})")
            }
            Self::InvalidEndpoint { path, .. } => format!("{self} ({path})"),
            Self::MissingApiKey | Self::ClientBuild { .. } => self.to_string(),
        }
    }

    /// HTTP status attached to the error, when the provider answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias for client results.
pub type RawgResult<T> = Result<T, RawgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_detail_carries_provider_message() {
        let err = RawgError::Status {
            endpoint: "games".to_string(),
            status: 401,
            message: "The key parameter is not provided".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "rawg returned an error status");
        assert_eq!(err.detail(), "games returned 401: The key parameter is not provided");
        assert_eq!(RawgError::MissingApiKey.status(), None);
    }
}

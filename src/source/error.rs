//! Error types for collaborator requests.

use thiserror::Error;

/// Errors that can occur while fetching dashboard data.
///
/// Every variant is treated the same by the poller: the tick is dropped and
/// the message is shown until the next tick.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (connect, timeout, transport).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("{endpoint} returned status {status}")]
    HttpStatus { endpoint: String, status: u16 },

    /// The response body could not be read or decoded.
    #[error("Failed to decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },

    /// The client could not be constructed.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl FetchError {
    pub(crate) fn decode(endpoint: &str, err: impl std::fmt::Display) -> Self {
        FetchError::Decode {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Network("request timed out".to_string())
        } else if err.is_decode() {
            FetchError::Decode {
                endpoint: err
                    .url()
                    .map(|u| u.path().to_string())
                    .unwrap_or_default(),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            FetchError::Config(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

//! Errors raised while talking to the kintone REST API

use serde::Deserialize;
use thiserror::Error;

/// Error code kintone returns for rejected credentials
const AUTH_FAILURE_CODE: &str = "CB_WA01";

#[derive(Debug, Error)]
pub enum KintoneError {
    #[error("invalid kintone url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("credentials cannot be sent as a header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("kintone returned HTTP {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("unexpected HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl KintoneError {
    /// Whether the server rejected the username/password pair
    pub fn is_auth_failure(&self) -> bool {
        match self {
            KintoneError::Api { status, code, .. } => *status == 401 || code == AUTH_FAILURE_CODE,
            KintoneError::Status { status, .. } => *status == 401,
            _ => false,
        }
    }
}

/// Error body kintone sends with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,

    #[serde(default)]
    pub message: String,
}

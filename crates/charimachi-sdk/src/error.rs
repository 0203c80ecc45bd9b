//! Errors raised by the routing client, location providers and sessions.

use serde::Deserialize;
use thiserror::Error;

/// `{ "error": "...", "message": "..." }` as returned by `/search`.
#[derive(Deserialize, Debug)]
pub struct ServiceErrorPayload {
    pub error: String,
    #[serde(default)]
    pub message: String,
}

/// `{ "error": { "code": n, "message": "..." } }` as returned by the
/// directions endpoint.
#[derive(Deserialize, Debug)]
pub struct UpstreamErrorDetail {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct UpstreamErrorPayload {
    pub error: UpstreamErrorDetail,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API error (HTTP {status}): {error}: {message}")]
    Service {
        status: u16,
        error: String,
        message: String,
    },

    #[error("API error (code {code}): {message}")]
    Upstream { code: u32, message: String },

    // Body was not in either known error shape
    #[error("Unstructured API error (HTTP {status}): {body}")]
    RawApi { status: u16, body: String },

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ClientError {
    /// Classify a non-success response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        if let Ok(payload) = serde_json::from_str::<UpstreamErrorPayload>(body) {
            return ClientError::Upstream {
                code: payload.error.code,
                message: payload.error.message,
            };
        }
        if let Ok(payload) = serde_json::from_str::<ServiceErrorPayload>(body) {
            return ClientError::Service {
                status,
                error: payload.error,
                message: payload.message,
            };
        }
        ClientError::RawApi {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("Planner session has stopped")]
    Closed,
}

//! Backend client error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the estimation and advice endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend could not be reached at all (refused, DNS, timeout)
    #[error(
        "Failed to connect to server ({base_url}).\n\nCheck:\n1. The backend is running\n2. This device has network access\n3. BODYFAT_API_URL points at the backend"
    )]
    Connection {
        /// Base URL that was tried
        base_url: String,
    },

    /// Non-2xx response
    #[error("{}", server_message(.status, .detail))]
    Server {
        /// HTTP status code
        status: u16,
        /// `detail` from the error body, when present
        detail: Option<String>,
    },

    /// A 2xx response whose body did not match the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// A selected photo could not be read for upload
    #[error("Failed to read photo {path}: {source}")]
    Photo {
        /// Local path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Any other transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

fn server_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => detail.clone(),
        None => format!("HTTP error! status: {}", status),
    }
}

impl ApiError {
    /// Server-provided detail, if this is a server error that carried one
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Pull a human-readable `detail` out of an error body.
///
/// String details are used as-is; structured details (e.g. a list of field
/// errors) are rendered as compact JSON.
pub fn extract_detail(body: &serde_json::Value) -> Option<String> {
    match body.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

//! Error types shared by the gateway, session and transport layers.
//!
//! Views catch these at the call site and turn them into UI state; nothing in
//! the live-results path escalates them further.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    // HTTP / networking
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unauthorized: please log in again")]
    Unauthorized,
    #[error("forbidden access")]
    Forbidden,
    #[error("resource not found")]
    NotFound,

    // Encoding
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid header value: {0}")]
    Header(#[from] tungstenite::http::header::InvalidHeaderValue),

    // Local state
    #[error("session store error: {0}")]
    Store(#[from] sled::Error),
    #[error("push channel error: {0}")]
    Channel(#[from] tungstenite::Error),
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    /// Whether the error means the session is no longer usable.
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Unauthorized | ClientError::NotAuthenticated)
    }

    /// Message suitable for a transient notification, preferring the
    /// server-provided text when there is one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Status { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

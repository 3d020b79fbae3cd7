//! Error types for the binance-depth crate.
//!
//! This module defines the errors that can occur while maintaining the local
//! book: transport failures, venue API errors, and exhausted retry budgets.
//! Sequence gaps are not errors; the sync engine recovers from them on its
//! own and reports them through its apply outcome.

use std::fmt;

/// The main error type for this crate
#[derive(Debug)]
pub enum Error {
    /// HTTP request failed
    Http(reqwest::Error),

    /// WebSocket error
    WebSocket(tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    Json(serde_json::Error),

    /// Invalid configuration (missing fields, bad format)
    Config(String),

    /// API returned an error response
    Api(ApiError),

    /// WebSocket connection closed unexpectedly
    ConnectionClosed,

    /// The book is not synchronized and the caller refused stale data
    NotSynced,

    /// Snapshot could not be established within the retry budget
    SnapshotUnavailable {
        /// Number of fetch attempts made
        attempts: u32,
    },

    /// Operation timed out
    Timeout,
}

/// Error returned by the Binance REST API
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Venue error code (if provided)
    pub code: Option<i64>,
    /// Error message
    pub message: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Http(e) => write!(f, "HTTP error: {}", e),
            Error::WebSocket(e) => write!(f, "WebSocket error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Api(e) => write!(f, "API error ({}): {}", e.status, e.message),
            Error::ConnectionClosed => write!(f, "WebSocket connection closed"),
            Error::NotSynced => write!(f, "Order book is not synchronized"),
            Error::SnapshotUnavailable { attempts } => {
                write!(f, "Snapshot unavailable after {} attempts", attempts)
            }
            Error::Timeout => write!(f, "Operation timed out"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(e) => Some(e),
            Error::WebSocket(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Http(err)
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::WebSocket(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl Error {
    /// Whether retrying the failed operation can succeed.
    ///
    /// Transport problems and timeouts are transient; venue rejections
    /// and exhausted retry budgets are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(_) | Error::WebSocket(_) | Error::ConnectionClosed | Error::Timeout => true,
            Error::Api(e) => e.is_server_error(),
            _ => false,
        }
    }
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            message: message.into(),
        }
    }

    /// Create an API error with a venue error code
    pub fn with_code(status: u16, code: i64, message: impl Into<String>) -> Self {
        Self {
            status,
            code: Some(code),
            message: message.into(),
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

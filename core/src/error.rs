//! Error types for the WebEx XML API client.
//!
//! # Design
//! One flat enum covering the four failure kinds a call can hit: validation
//! (bad endpoint URL or send-mode string), usage (missing configuration or an
//! out-of-range history lookup), transport (socket or HTTP failure), and
//! decode (unexpected response shape). The original client terminated the
//! process on every one of these; here each is a value the caller can match
//! on and recover from.

use std::fmt;

/// Errors returned by [`crate::WebexClient`] and the transport/decode layers.
#[derive(Debug)]
pub enum ApiError {
    /// The endpoint URL failed validation (scheme, allow-listed domain,
    /// or general URL syntax).
    InvalidUrl(String),

    /// A send-mode string was neither `"http"` nor `"socket"`.
    InvalidSendMode(String),

    /// An operation was invoked before all four credential fields were set
    /// to non-empty values.
    MissingCredentials,

    /// An operation was invoked before an endpoint was configured.
    MissingEndpoint,

    /// A history accessor referenced a call that was never made. Call
    /// numbers are 1-based; `completed` is the number of finished calls.
    InvalidResponseNumber { requested: usize, completed: usize },

    /// The transport layer failed before a response was read (connect,
    /// write, or read error).
    Transport(String),

    /// The server answered with a non-200 status.
    HttpError { status: u16, body: String },

    /// The response body could not be decoded into the expected XML shape.
    DecodeError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidUrl(msg) => write!(f, "invalid webex url: {msg}"),
            ApiError::InvalidSendMode(mode) => {
                write!(f, "invalid send mode `{mode}` (expected `http` or `socket`)")
            }
            ApiError::MissingCredentials => {
                write!(f, "credentials not set (webExID, password, siteID, partnerID)")
            }
            ApiError::MissingEndpoint => write!(f, "endpoint not set"),
            ApiError::InvalidResponseNumber { requested, completed } => {
                write!(f, "invalid response number {requested}: {completed} calls completed")
            }
            ApiError::Transport(msg) => write!(f, "transport failed: {msg}"),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DecodeError(msg) => write!(f, "response decode failed: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

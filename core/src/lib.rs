//! Synchronous client core for the legacy Cisco WebEx XML API.
//!
//! # Overview
//! Assembles the hand-built XML envelope (security context + operation
//! fragment), sends it as `UID/PWD/SID/PID/XML` form fields over one of two
//! transports, and decodes the fixed-shape XML response into typed records.
//! One Reference Guide operation is implemented
//! (`meeting.LstsummaryMeeting`); the client keeps an append-only history of
//! completed calls, readable by 1-based call number or "most recent".
//!
//! # Design
//! - `WebexClient` owns all state (credentials, endpoint, send mode,
//!   history); nothing is process-global, so multiple clients coexist.
//! - Every failure is an `ApiError` value the caller can match on; nothing
//!   exits the process.
//! - The two send strategies implement the `Transport` trait over plain-data
//!   `WireRequest`/`WireResponse` values, so tests can drive the full call
//!   path without a network.

pub mod client;
pub mod decode;
pub mod endpoint;
pub mod envelope;
pub mod error;
pub mod transport;
pub mod types;

pub use client::WebexClient;
pub use endpoint::{Endpoint, Scheme, WEBEX_DOMAIN};
pub use error::ApiError;
pub use transport::{
    HttpTransport, SendMode, SocketTransport, Transport, WireRequest, WireResponse,
};
pub use types::{
    CallRecord, Credentials, LstSummaryMeetingResponse, MeetingSummary, ResponseStatus,
};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("webex-core/", env!("CARGO_PKG_VERSION"));

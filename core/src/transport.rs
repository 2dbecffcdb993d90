//! Transport dispatch: form-body encoding, header construction, and the two
//! send strategies.
//!
//! # Design
//! A call is reduced to a plain-data [`WireRequest`] (target, header lines,
//! URL-encoded form body) and handed to a [`Transport`] strategy. Exactly two
//! production strategies exist, selected by [`SendMode`]: [`HttpTransport`]
//! drives a fresh `ureq` agent per call with certificate verification
//! disabled, and [`SocketTransport`] writes a literal `HTTP/1.0` request over
//! a bare `TcpStream` and reads until end-of-stream. Keeping the request and
//! response as plain data lets tests substitute a recording double for the
//! whole network layer.
//!
//! Both strategies are synchronous and blocking, one connection per call,
//! with no timeout or retry. The content headers differ between modes on
//! purpose: the socket path declares `Content-Type`/`Content-Length`
//! explicitly, while the pooled path lets the HTTP library supply its own
//! form-encoded defaults — the server accepts both framings.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::str::FromStr;

use ureq::tls::TlsConfig;

use crate::endpoint::{Endpoint, Scheme};
use crate::error::ApiError;
use crate::types::Credentials;
use crate::USER_AGENT;

/// Fixed request path of the XML service on every site.
pub const XML_API_PATH: &str = "WBXService/XMLService";

/// Which of the two send strategies a client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendMode {
    /// HTTP library transport ([`HttpTransport`]).
    #[default]
    Http,
    /// Raw TCP transport ([`SocketTransport`]).
    Socket,
}

impl SendMode {
    /// Every supported send mode.
    pub const ALL: [SendMode; 2] = [SendMode::Http, SendMode::Socket];
}

impl FromStr for SendMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(SendMode::Http),
            "socket" => Ok(SendMode::Socket),
            other => Err(ApiError::InvalidSendMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for SendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendMode::Http => write!(f, "http"),
            SendMode::Socket => write!(f, "socket"),
        }
    }
}

/// An outgoing call described as plain data.
///
/// Built by [`build_request`]; consumed by a [`Transport`]. All fields are
/// owned so a request can be recorded or replayed freely.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    /// Absolute request path, `/WBXService/XMLService`.
    pub path: String,
    /// Header lines in send order. Socket mode carries two more entries
    /// than HTTP mode (the explicit content headers).
    pub headers: Vec<(String, String)>,
    /// The URL-encoded form body.
    pub body: String,
}

/// The transport-level reply to a [`WireRequest`].
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub body: String,
}

/// One "send a request, receive a response" strategy.
///
/// Implemented by [`HttpTransport`] and [`SocketTransport`]; tests inject
/// their own implementations via `WebexClient::set_transport`.
pub trait Transport: Send {
    fn send(&self, request: &WireRequest) -> Result<WireResponse, ApiError>;
}

/// Serialize credentials and the envelope into the legacy form body and
/// build the header lines for the given mode.
pub fn build_request(
    endpoint: &Endpoint,
    mode: SendMode,
    credentials: &Credentials,
    envelope: &str,
) -> WireRequest {
    let body = encode_form(credentials, envelope);
    let mut headers = vec![
        ("Host".to_string(), endpoint.host().to_string()),
        ("User-Agent".to_string(), USER_AGENT.to_string()),
    ];
    if mode == SendMode::Socket {
        headers.push(("Content-Type".to_string(), "application/xml".to_string()));
        headers.push(("Content-Length".to_string(), body.len().to_string()));
    }
    WireRequest {
        scheme: endpoint.scheme(),
        host: endpoint.host().to_string(),
        port: endpoint.port(),
        path: format!("/{XML_API_PATH}"),
        headers,
        body,
    }
}

/// `UID=&PWD=&SID=&PID=&XML=` with every value form-urlencoded.
///
/// Field order and the trailing `&` match the legacy client; the service
/// rejects the canonical (no-trailing-separator) framing.
fn encode_form(credentials: &Credentials, envelope: &str) -> String {
    let fields = [
        ("UID", credentials.webex_id.as_str()),
        ("PWD", credentials.password.as_str()),
        ("SID", credentials.site_id.as_str()),
        ("PID", credentials.partner_id.as_str()),
        ("XML", envelope),
    ];
    let mut body = String::with_capacity(envelope.len() * 2);
    for (name, value) in fields {
        body.push_str(name);
        body.push('=');
        body.extend(url::form_urlencoded::byte_serialize(value.as_bytes()));
        body.push('&');
    }
    body
}

/// Pooled-connection strategy: a fresh HTTP agent per call.
///
/// Certificate verification is disabled, matching the legacy client's
/// `CURLOPT_SSL_VERIFYPEER = false` — customer sites historically served
/// certificates the default store would refuse. Non-2xx statuses are
/// returned as data; the caller decides what a bad status means.
#[derive(Debug, Clone, Copy)]
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn send(&self, request: &WireRequest) -> Result<WireResponse, ApiError> {
        let url = format!(
            "{}://{}:{}{}",
            request.scheme, request.host, request.port, request.path
        );
        tracing::debug!(url = %url, "sending xml api request over http");

        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(TlsConfig::builder().disable_verification(true).build())
            .build()
            .new_agent();

        let mut builder = agent.post(&url);
        for (name, value) in &request.headers {
            // The agent derives Host from the URL and owns the content
            // headers for the body it sends.
            if name.eq_ignore_ascii_case("host")
                || name.eq_ignore_ascii_case("content-type")
                || name.eq_ignore_ascii_case("content-length")
            {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .content_type("application/x-www-form-urlencoded")
            .send(request.body.as_bytes())
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(status, bytes = body.len(), "http transport response");

        Ok(WireResponse { status, body })
    }
}

/// Raw-socket strategy: hand-framed `HTTP/1.0` over a bare TCP stream.
///
/// No TLS — `https` endpoints belong to [`HttpTransport`]. The response is
/// accumulated in fixed 1024-byte reads until the server closes the
/// connection (`HTTP/1.0` semantics), then split into status and body.
#[derive(Debug, Clone, Copy)]
pub struct SocketTransport;

impl Transport for SocketTransport {
    fn send(&self, request: &WireRequest) -> Result<WireResponse, ApiError> {
        tracing::debug!(
            host = %request.host,
            port = request.port,
            "sending xml api request over raw socket"
        );
        let mut stream = TcpStream::connect((request.host.as_str(), request.port))
            .map_err(|e| {
                ApiError::Transport(format!("connect {}:{}: {e}", request.host, request.port))
            })?;

        let raw = render_socket_request(request);
        stream
            .write_all(raw.as_bytes())
            .map_err(|e| ApiError::Transport(format!("write to {}: {e}", request.host)))?;

        let mut received = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => received.extend_from_slice(&chunk[..n]),
                Err(e) => {
                    return Err(ApiError::Transport(format!(
                        "read from {}: {e}",
                        request.host
                    )));
                }
            }
        }

        let text = String::from_utf8(received)
            .map_err(|_| ApiError::Transport("response is not valid UTF-8".to_string()))?;
        let response = split_http_response(&text)?;
        tracing::debug!(
            status = response.status,
            bytes = response.body.len(),
            "socket transport response"
        );
        Ok(response)
    }
}

/// Render the literal request bytes for the socket strategy.
fn render_socket_request(request: &WireRequest) -> String {
    let mut raw = String::with_capacity(request.body.len() + 256);
    raw.push_str("POST ");
    raw.push_str(&request.path);
    raw.push_str(" HTTP/1.0\r\n");
    for (name, value) in &request.headers {
        raw.push_str(name);
        raw.push_str(": ");
        raw.push_str(value);
        raw.push_str("\r\n");
    }
    raw.push_str("\r\n");
    raw.push_str(&request.body);
    raw
}

/// Split a raw HTTP response into status code and body.
fn split_http_response(raw: &str) -> Result<WireResponse, ApiError> {
    let (head, body) = match raw.split_once("\r\n\r\n") {
        Some(parts) => parts,
        None => raw.split_once("\n\n").ok_or_else(|| {
            ApiError::Transport("response has no header/body separator".to_string())
        })?,
    };
    let status_line = head.lines().next().unwrap_or_default();
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| {
            ApiError::Transport(format!("malformed status line `{status_line}`"))
        })?;
    Ok(WireResponse {
        status,
        body: body.to_string(),
    })
}

//! Endpoint configuration: scheme, host, and the domain allow-list.
//!
//! # Design
//! A client endpoint is a `(scheme, host)` pair; the port is derived from
//! the scheme (80/443) unless explicitly overridden. URL strings entering
//! through [`Endpoint::parse`] (and `WebexClient::set_url`) must name a
//! subdomain of [`WEBEX_DOMAIN`] with no explicit port, path, query, or
//! fragment. [`Endpoint::new`] skips the allow-list so tests and self-hosted
//! gateways can target arbitrary hosts.

use url::Url;

use crate::error::ApiError;

/// Domain suffix accepted by [`Endpoint::parse`].
pub const WEBEX_DOMAIN: &str = "webex.com";

/// Transport-level scheme of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// The well-known port for this scheme: 80 for plaintext, 443 for TLS.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// A validated API endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    scheme: Scheme,
    host: String,
    port: Option<u16>,
}

impl Endpoint {
    /// Parse and validate a customer site URL, e.g.
    /// `https://company.webex.com`.
    ///
    /// Accepts only `http`/`https` and a host ending in `.webex.com`
    /// (case-insensitive); explicit ports, paths, queries, and fragments are
    /// rejected.
    pub fn parse(url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(url).map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}")))?;

        let scheme = match parsed.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(ApiError::InvalidUrl(format!("unsupported scheme `{other}`")));
            }
        };
        let host = match parsed.host_str() {
            Some(host) => host.to_ascii_lowercase(),
            None => return Err(ApiError::InvalidUrl(format!("{url}: missing host"))),
        };
        if parsed.port().is_some() {
            return Err(ApiError::InvalidUrl(format!("{url}: explicit port not allowed")));
        }
        if !matches!(parsed.path(), "" | "/") || parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ApiError::InvalidUrl(format!("{url}: path or query not allowed")));
        }

        let suffix = format!(".{WEBEX_DOMAIN}");
        match host.strip_suffix(suffix.as_str()) {
            Some(label) if !label.is_empty() && !label.ends_with('.') => {}
            _ => {
                return Err(ApiError::InvalidUrl(format!(
                    "host `{host}` is not a {WEBEX_DOMAIN} subdomain"
                )));
            }
        }

        Ok(Self { scheme, host, port: None })
    }

    /// Build an endpoint without the domain allow-list. The URL-string
    /// surface ([`Endpoint::parse`]) remains the validated path; this is for
    /// tests and deployments that front the API behind another host.
    pub fn new(scheme: Scheme, host: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
            port: None,
        }
    }

    /// Override the scheme-derived port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The effective network port: the override if present, otherwise the
    /// scheme default.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(self.scheme.default_port())
    }
}

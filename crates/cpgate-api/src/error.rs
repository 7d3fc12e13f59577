use thiserror::Error;

/// Top-level error type for the `cpgate-api` crate.
///
/// Covers every failure mode of a Management Web API call: vendor
/// rejections (non-2xx), transport failures, and malformed bodies.
/// `cpgate-core` maps these into the proxy's user-facing taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Vendor ──────────────────────────────────────────────────────
    /// Non-2xx response from the management server.
    ///
    /// `message` and `code` are lifted from the vendor's JSON body when
    /// present; the HTTP status is always the original one.
    #[error(
        "Management API error (HTTP {status}): {}",
        message.as_deref().unwrap_or("no message")
    )]
    Api {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The session identifier cannot be sent as an HTTP header value.
    #[error("Invalid session identifier: {0}")]
    InvalidSessionId(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The vendor HTTP status, if the management server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The vendor's own `message` field, if it sent one.
    pub fn vendor_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_uses_vendor_message() {
        let err = Error::Api {
            status: 500,
            code: None,
            message: Some("bad cert".into()),
        };
        assert_eq!(err.to_string(), "Management API error (HTTP 500): bad cert");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.vendor_message(), Some("bad cert"));
    }

    #[test]
    fn api_error_without_message_still_displays() {
        let err = Error::Api {
            status: 404,
            code: None,
            message: None,
        };
        assert_eq!(err.to_string(), "Management API error (HTTP 404): no message");
        assert_eq!(err.vendor_message(), None);
    }
}

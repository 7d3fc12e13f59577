// ── Proxy error taxonomy ──
//
// Every proxy operation resolves to one of four kinds before it returns:
// validation (400), auth (401), vendor (forwarded status), or transport
// (500). Transport detail is logged here and never handed to the caller.

use thiserror::Error;
use tracing::error;

/// Missing or unusable session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No session id at all.
    #[error("Not authenticated")]
    NotAuthenticated,
    /// A session id but no management domain.
    #[error("Domain not specified")]
    DomainNotSpecified,
}

/// The proxied operation an error came from. Selects fallback wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    ListGateways,
    CreateGateway,
    Publish,
}

impl Operation {
    /// Used when the vendor rejects a call without a `message`.
    pub fn vendor_fallback(self) -> &'static str {
        match self {
            Self::Login => "Authentication failed",
            Self::ListGateways => "Failed to fetch gateways",
            Self::CreateGateway => "Failed to create gateway",
            Self::Publish => "Failed to publish changes",
        }
    }

    /// Generic 500-class message for transport failures.
    pub fn transport_message(self) -> &'static str {
        match self {
            Self::Login => "An error occurred during authentication",
            Self::ListGateways => "An error occurred while fetching gateways",
            Self::CreateGateway => "An error occurred while creating the gateway",
            Self::Publish => "An error occurred while publishing changes",
        }
    }
}

/// Uniform error returned by every proxy operation.
///
/// `Display` is exactly the caller-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// Required input missing; nothing was sent to the vendor.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Non-2xx from the management server, status preserved.
    #[error("{message}")]
    Vendor { status: u16, message: String },

    /// Network or parse failure reaching the management server.
    #[error("{message}")]
    Transport { message: String },
}

impl ProxyError {
    pub(crate) fn required(field: &'static str, message: &str) -> Self {
        Self::Validation {
            field,
            message: message.to_owned(),
        }
    }

    /// Map a client error into the taxonomy for `op`.
    pub fn from_api(err: cpgate_api::Error, op: Operation) -> Self {
        match err {
            cpgate_api::Error::Api {
                status, message, ..
            } => Self::Vendor {
                status,
                message: message.unwrap_or_else(|| op.vendor_fallback().to_owned()),
            },
            other => {
                error!(operation = ?op, error = %other, "management API unreachable");
                Self::Transport {
                    message: op.transport_message().to_owned(),
                }
            }
        }
    }

    /// HTTP status to answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Auth(_) => 401,
            Self::Vendor { status, .. } => *status,
            Self::Transport { .. } => 500,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_message_and_status_forwarded() {
        let err = ProxyError::from_api(
            cpgate_api::Error::Api {
                status: 500,
                code: None,
                message: Some("bad cert".into()),
            },
            Operation::ListGateways,
        );
        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), "bad cert");
    }

    #[test]
    fn vendor_without_message_uses_operation_fallback() {
        let err = ProxyError::from_api(
            cpgate_api::Error::Api {
                status: 500,
                code: None,
                message: None,
            },
            Operation::CreateGateway,
        );
        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), "Failed to create gateway");
    }

    #[test]
    fn transport_failures_hide_detail() {
        let err = ProxyError::from_api(
            cpgate_api::Error::Tls("handshake failed: unknown issuer".into()),
            Operation::Login,
        );
        assert_eq!(err.status(), 500);
        assert_eq!(err.message(), "An error occurred during authentication");
    }

    #[test]
    fn auth_errors_are_401() {
        let missing = ProxyError::from(AuthError::NotAuthenticated);
        assert_eq!(missing.status(), 401);
        assert_eq!(missing.message(), "Not authenticated");

        let no_domain = ProxyError::from(AuthError::DomainNotSpecified);
        assert_eq!(no_domain.message(), "Domain not specified");
    }

    #[test]
    fn validation_is_400() {
        let err = ProxyError::required("name", "Gateway name is required");
        assert_eq!(err.status(), 400);
        assert_eq!(err.message(), "Gateway name is required");
    }
}

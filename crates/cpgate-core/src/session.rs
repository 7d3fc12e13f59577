// ── Session value ──
//
// A management session is an explicit value handed to every proxy call.
// Where it is persisted between calls (cookies, memory) is the caller's
// business; the proxy only ever reads it.

use cpgate_api::SessionId;

use crate::error::AuthError;

/// Cookie holding the vendor session id.
pub const SID_COOKIE: &str = "checkpoint_sid";
/// Cookie holding the management domain.
pub const DOMAIN_COOKIE: &str = "checkpoint_domain";

/// An authenticated management session: vendor sid plus domain.
///
/// Created once by a successful login and never rewritten afterwards.
/// Expiry is enforced by the management server alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    sid: SessionId,
    domain: String,
}

impl Session {
    pub fn new(sid: SessionId, domain: impl Into<String>) -> Self {
        Self {
            sid,
            domain: domain.into(),
        }
    }

    /// Rebuild a session from separately stored values.
    ///
    /// Empty values count as absent. The sid is checked first, so a request
    /// with neither reports [`AuthError::NotAuthenticated`].
    pub fn from_parts(sid: Option<&str>, domain: Option<&str>) -> Result<Self, AuthError> {
        let sid = sid
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::NotAuthenticated)?;
        let domain = domain
            .filter(|d| !d.is_empty())
            .ok_or(AuthError::DomainNotSpecified)?;
        Ok(Self::new(SessionId::new(sid), domain))
    }

    pub fn sid(&self) -> &SessionId {
        &self.sid
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sid_is_not_authenticated() {
        assert_eq!(
            Session::from_parts(None, Some("Global")),
            Err(AuthError::NotAuthenticated)
        );
        assert_eq!(
            Session::from_parts(Some(""), Some("Global")),
            Err(AuthError::NotAuthenticated)
        );
    }

    #[test]
    fn missing_domain_is_reported_after_sid() {
        assert_eq!(
            Session::from_parts(Some("abc"), None),
            Err(AuthError::DomainNotSpecified)
        );
        assert_eq!(Session::from_parts(None, None), Err(AuthError::NotAuthenticated));
    }

    #[test]
    fn values_are_kept_verbatim() {
        match Session::from_parts(Some("a b=c"), Some("SMC User")) {
            Ok(session) => {
                assert_eq!(session.sid().expose(), "a b=c");
                assert_eq!(session.domain(), "SMC User");
            }
            Err(e) => panic!("valid parts rejected: {e}"),
        }
    }
}

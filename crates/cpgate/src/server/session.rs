//! Session cookies: reading them into a `Session` and writing them at login.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use cpgate_core::{DOMAIN_COOKIE, SID_COOKIE, Session};

use super::error::ErrorResponse;

/// Extracts the caller's `Session` from its cookies.
///
/// Rejects with 401 before the handler (or its body) runs.
#[derive(Debug, Clone)]
pub struct SessionCookies(pub Session);

impl<S: Send + Sync> FromRequestParts<S> for SessionCookies {
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session = Session::from_parts(
            jar.get(SID_COOKIE).map(Cookie::value),
            jar.get(DOMAIN_COOKIE).map(Cookie::value),
        )?;
        Ok(Self(session))
    }
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

/// Add both session cookies to `jar`. No expiry: they last for the browser
/// session.
pub fn with_session(jar: CookieJar, session: &Session) -> CookieJar {
    jar.add(session_cookie(SID_COOKIE, session.sid().expose().to_owned()))
        .add(session_cookie(DOMAIN_COOKIE, session.domain().to_owned()))
}

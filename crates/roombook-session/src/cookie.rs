//! Cookie builder for the session credential.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::session::SESSION_EXP_SECS;

/// Cookie name carrying the session credential.
pub const AUTH_TOKEN: &str = "auth_token";

/// Set the session cookie on the jar.
///
/// `secure` is driven by configuration so local development over plain HTTP
/// still works; production deployments set it.
///
/// ```
/// use axum_extra::extract::cookie::{CookieJar, SameSite};
/// use roombook_session::cookie::{set_session_cookie, AUTH_TOKEN};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "credential".to_string(), true);
/// let cookie = jar.get(AUTH_TOKEN).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert_eq!(cookie.same_site(), Some(SameSite::Strict));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, secure: bool) -> CookieJar {
    let cookie = Cookie::build((AUTH_TOKEN, value))
        .path("/")
        .max_age(Duration::seconds(SESSION_EXP_SECS as i64))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .build();
    jar.add(cookie)
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use roombook_session::cookie::{clear_session_cookie, set_session_cookie, AUTH_TOKEN};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "credential".to_string(), true);
/// let jar = clear_session_cookie(jar, true);
/// let cookie = jar.get(AUTH_TOKEN).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, secure: bool) -> CookieJar {
    let cookie = Cookie::build((AUTH_TOKEN, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .build();
    jar.add(cookie)
}

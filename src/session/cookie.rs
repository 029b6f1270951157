//! Session storage backed by browser session cookies.
//!
//! Cookies are issued without `Max-Age`/`Expires`, so the browser drops them
//! when the session ends, which mirrors tab-scoped session storage.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::session::storage::{keys, SessionStorage};

/// Read-only view over the cookies of one request.
#[derive(Debug, Clone)]
pub struct CookieSession {
    jar: CookieJar,
}

impl CookieSession {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            jar: CookieJar::from_headers(headers),
        }
    }

    pub fn from_jar(jar: CookieJar) -> Self {
        Self { jar }
    }
}

impl SessionStorage for CookieSession {
    fn get_item(&self, key: &str) -> Option<String> {
        self.jar
            .get(key)
            .map(Cookie::value)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    }
}

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Adds the credential and role cookies to `jar`.
pub fn store_credentials(jar: CookieJar, token: &str, role: &str, secure: bool) -> CookieJar {
    jar.add(session_cookie(keys::SA_TOKEN, token.to_owned(), secure))
        .add(session_cookie(keys::ROLE, role.to_owned(), secure))
}

/// Expires the credential and role cookies.
pub fn clear_credentials(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(keys::SA_TOKEN).path("/"))
        .remove(Cookie::build(keys::ROLE).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_reads_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "saToken=abc; role=student".parse().unwrap());

        let session = CookieSession::from_headers(&headers);
        assert_eq!(session.get_item(keys::SA_TOKEN).as_deref(), Some("abc"));
        assert_eq!(session.get_item(keys::ROLE).as_deref(), Some("student"));
    }

    #[test]
    fn test_no_cookie_header_is_anonymous() {
        let session = CookieSession::from_headers(&HeaderMap::new());
        assert_eq!(session.get_item(keys::SA_TOKEN), None);
    }

    #[test]
    fn test_store_credentials_sets_session_cookies() {
        let jar = store_credentials(CookieJar::new(), "abc", "student", false);
        let token = jar.get(keys::SA_TOKEN).unwrap();
        assert_eq!(token.value(), "abc");
        assert_eq!(token.max_age(), None);
        assert_eq!(jar.get(keys::ROLE).unwrap().value(), "student");
    }
}

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::tokens::IssuedSession;

pub const ACCESS_COOKIE: &str = "access_token_cookie";
pub const REFRESH_COOKIE: &str = "refresh_token_cookie";

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    // Session cookies: no max-age, the token's own exp bounds the lifetime.
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Attaches both session tokens to the outgoing response.
pub fn set_session_cookies(jar: CookieJar, session: IssuedSession) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, session.access_token))
        .add(session_cookie(REFRESH_COOKIE, session.refresh_token))
}

/// Replaces only the access cookie, after a refresh.
pub fn set_access_cookie(jar: CookieJar, access_token: String) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, access_token))
}

pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_COOKIE).path("/").build())
        .remove(Cookie::build(REFRESH_COOKIE).path("/").build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookies_are_http_only_and_scoped_to_root() {
        let c = session_cookie(ACCESS_COOKIE, "tok".into());
        assert_eq!(c.name(), "access_token_cookie");
        assert_eq!(c.path(), Some("/"));
        assert_eq!(c.http_only(), Some(true));
        assert_eq!(c.same_site(), Some(SameSite::Lax));
        assert!(c.max_age().is_none());
    }

    #[test]
    fn set_then_clear_removes_both_cookies() {
        let jar = set_session_cookies(
            CookieJar::new(),
            IssuedSession {
                access_token: "a".into(),
                refresh_token: "r".into(),
            },
        );
        assert!(jar.get(ACCESS_COOKIE).is_some());
        assert!(jar.get(REFRESH_COOKIE).is_some());

        let jar = clear_session_cookies(jar);
        assert!(jar.get(ACCESS_COOKIE).is_none());
        assert!(jar.get(REFRESH_COOKIE).is_none());
    }
}

//! `customer_session` cookie handling
//!
//! The cookie binds a browser to the orders it placed so the customer menu can
//! poll their status. It carries no authority beyond that.

use http::HeaderMap;
use http::header::COOKIE;

pub const SESSION_COOKIE: &str = "customer_session";

/// One year
const SESSION_MAX_AGE_SECS: u64 = 31_536_000;

/// Read the session id from the request cookies, if present and non-empty
pub fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for the session id
pub fn session_cookie(session: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={session}; Path=/; Max-Age={SESSION_MAX_AGE_SECS}; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn finds_session_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; customer_session=abc-123; lang=en"),
        );
        assert_eq!(session_from_headers(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn missing_or_empty_session() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_from_headers(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("customer_session="));
        assert_eq!(session_from_headers(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("customer_sessionx=1"));
        assert_eq!(session_from_headers(&headers), None);
    }

    #[test]
    fn cookie_attributes() {
        assert_eq!(
            session_cookie("s1", false),
            "customer_session=s1; Path=/; Max-Age=31536000; HttpOnly; SameSite=Lax"
        );
        assert!(session_cookie("s1", true).ends_with("; Secure"));
    }
}

//! Credential extraction from HTTP requests.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum_extra::extract::CookieJar;
use base64::Engine;

use crate::strategy::Credentials;

use super::SESSION_COOKIE;

/// Parses an HTTP Basic `Authorization` header into an id/secret pair.
#[must_use]
pub fn basic_pair(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let pair = String::from_utf8(decoded).ok()?;
    let (id, secret) = pair.split_once(':')?;
    Some((id.to_string(), secret.to_string()))
}

/// Extracts a bearer token from the `Authorization` header.
#[must_use]
pub fn bearer_value(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|t| t.trim().to_string())
}

/// Extracts the signed session value from the session cookie, falling
/// back to a bearer-style `Authorization` header.
#[must_use]
pub fn session_value(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| bearer_value(headers))
}

/// Builds the credential set seen by browser endpoints.
#[must_use]
pub fn session_credentials(jar: &CookieJar, headers: &HeaderMap) -> Credentials {
    Credentials {
        session_token: session_value(jar, headers),
        ..Credentials::default()
    }
}

/// Builds the credential set seen by bearer-protected endpoints.
#[must_use]
pub fn bearer_credentials(headers: &HeaderMap) -> Credentials {
    Credentials {
        bearer: bearer_value(headers),
        ..Credentials::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum_extra::extract::cookie::Cookie;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_basic_pair_round_trip() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("app:s3cret");
        let headers = headers_with_auth(&format!("Basic {encoded}"));

        let (id, secret) = basic_pair(&headers).unwrap();
        assert_eq!(id, "app");
        assert_eq!(secret, "s3cret");
    }

    #[test]
    fn test_basic_pair_rejects_garbage() {
        assert!(basic_pair(&headers_with_auth("Basic not-base64!")).is_none());
        assert!(basic_pair(&headers_with_auth("Bearer abc")).is_none());
        assert!(basic_pair(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_bearer_value() {
        let headers = headers_with_auth("Bearer tok-123");
        assert_eq!(bearer_value(&headers).as_deref(), Some("tok-123"));
        assert!(bearer_value(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_session_value_prefers_cookie() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "from-cookie"));
        let headers = headers_with_auth("Bearer from-header");

        assert_eq!(
            session_value(&jar, &headers).as_deref(),
            Some("from-cookie")
        );
        assert_eq!(
            session_value(&CookieJar::new(), &headers).as_deref(),
            Some("from-header")
        );
    }
}

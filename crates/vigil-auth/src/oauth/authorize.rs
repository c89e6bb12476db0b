//! Authorization endpoint types.
//!
//! Request parsing and redirect building for `GET /oauth/authorize`.
//! Successful grants redirect back to the client's callback: codes in
//! the query string, implicit tokens in the URL fragment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Authorization request parameters, received as query string parameters
/// on the authorization endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizationRequest {
    /// Requested response type: `code` or `token`.
    pub response_type: String,

    /// Public client identifier issued at registration.
    pub client_id: String,

    /// Redirect URI where the response will be sent. Must exactly match
    /// the client's registered redirect URI (string equality, no
    /// normalization).
    pub redirect_uri: String,
}

/// Supported response types for the authorization endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Authorization code flow.
    Code,
    /// Implicit flow: the token is delivered directly in the fragment.
    Token,
}

impl ResponseType {
    /// Returns the string representation of the response type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Token => "token",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "token" => Ok(Self::Token),
            other => Err(AuthError::unsupported_response_type(other)),
        }
    }
}

/// Builds the redirect URL delivering an authorization code.
///
/// # Errors
///
/// Returns `InvalidRedirectUri` if the redirect URI cannot be parsed.
pub fn code_redirect_url(redirect_uri: &str, code: &str) -> Result<String, AuthError> {
    let mut url = url::Url::parse(redirect_uri)
        .map_err(|e| AuthError::invalid_redirect_uri(format!("unparseable redirect URI: {e}")))?;
    url.query_pairs_mut().append_pair("code", code);
    Ok(url.to_string())
}

/// Builds the redirect URL delivering an implicit-flow token in the
/// URL fragment.
///
/// # Errors
///
/// Returns `InvalidRedirectUri` if the redirect URI cannot be parsed.
pub fn token_fragment_url(
    redirect_uri: &str,
    access_token: &str,
    expires_in: u64,
) -> Result<String, AuthError> {
    let mut url = url::Url::parse(redirect_uri)
        .map_err(|e| AuthError::invalid_redirect_uri(format!("unparseable redirect URI: {e}")))?;
    let fragment = format!(
        "access_token={}&token_type=bearer&expires_in={expires_in}",
        urlencode(access_token)
    );
    url.set_fragment(Some(&fragment));
    Ok(url.to_string())
}

/// Builds the redirect URL reporting a denied authorization.
///
/// # Errors
///
/// Returns `InvalidRedirectUri` if the redirect URI cannot be parsed.
pub fn denied_redirect_url(redirect_uri: &str) -> Result<String, AuthError> {
    let mut url = url::Url::parse(redirect_uri)
        .map_err(|e| AuthError::invalid_redirect_uri(format!("unparseable redirect URI: {e}")))?;
    url.query_pairs_mut().append_pair("error", "access_denied");
    Ok(url.to_string())
}

/// Percent-encodes a value for use inside a URL fragment.
fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_type_parse() {
        assert_eq!("code".parse::<ResponseType>().unwrap(), ResponseType::Code);
        assert_eq!(
            "token".parse::<ResponseType>().unwrap(),
            ResponseType::Token
        );
        assert!(matches!(
            "id_token".parse::<ResponseType>(),
            Err(AuthError::UnsupportedResponseType { .. })
        ));
    }

    #[test]
    fn test_code_redirect_url() {
        let url = code_redirect_url("http://cb/", "XYZ").unwrap();
        assert_eq!(url, "http://cb/?code=XYZ");
    }

    #[test]
    fn test_code_redirect_url_preserves_existing_query() {
        let url = code_redirect_url("http://cb/?app=1", "XYZ").unwrap();
        assert_eq!(url, "http://cb/?app=1&code=XYZ");
    }

    #[test]
    fn test_token_fragment_url() {
        let url = token_fragment_url("http://cb/", "tok", 3600).unwrap();
        assert_eq!(
            url,
            "http://cb/#access_token=tok&token_type=bearer&expires_in=3600"
        );
    }

    #[test]
    fn test_denied_redirect_url() {
        let url = denied_redirect_url("http://cb/").unwrap();
        assert_eq!(url, "http://cb/?error=access_denied");
    }

    #[test]
    fn test_unparseable_redirect_uri() {
        assert!(matches!(
            code_redirect_url("not a url", "XYZ"),
            Err(AuthError::InvalidRedirectUri { .. })
        ));
    }
}

//! Token endpoint wire types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Supported grant types at the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    /// Exchange of an authorization code.
    AuthorizationCode,
    /// Resource-owner password credentials.
    Password,
    /// Client acting on its own behalf.
    ClientCredentials,
}

impl GrantType {
    /// Returns the string representation of the grant type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::Password => "password",
            Self::ClientCredentials => "client_credentials",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GrantType {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authorization_code" => Ok(Self::AuthorizationCode),
            "password" => Ok(Self::Password),
            "client_credentials" => Ok(Self::ClientCredentials),
            other => Err(AuthError::unsupported_grant_type(other)),
        }
    }
}

/// Token request body (`application/x-www-form-urlencoded`).
///
/// Grant-specific fields are optional; the exchange handler for the
/// declared `grant_type` validates the ones it needs. Client credentials
/// may arrive in the body (`client_id`/`client_secret`) or via HTTP
/// Basic auth; both feed the same client-secret verification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    /// Requested grant type.
    pub grant_type: String,

    /// Authorization code (authorization_code grant).
    #[serde(default)]
    pub code: Option<String>,

    /// Redirect URI the code was bound to (authorization_code grant).
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// Resource-owner login name (password grant).
    #[serde(default)]
    pub username: Option<String>,

    /// Resource-owner password (password grant).
    #[serde(default)]
    pub password: Option<String>,

    /// Public client id, when authenticating via the request body.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Client secret, when authenticating via the request body.
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Successful token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The issued bearer token value.
    pub access_token: String,

    /// Always `bearer`.
    pub token_type: String,

    /// Seconds until the token expires.
    pub expires_in: u64,
}

impl TokenResponse {
    /// Creates a bearer token response.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>, expires_in: u64) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// OAuth 2.0 error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthErrorResponse {
    /// RFC 6749 error code.
    pub error: String,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl From<&AuthError> for OAuthErrorResponse {
    fn from(err: &AuthError) -> Self {
        Self {
            error: err.oauth_error_code().to_string(),
            // Server faults keep their details out of the response body.
            error_description: if err.is_server_error() {
                None
            } else {
                Some(err.to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_type_parse() {
        assert_eq!(
            "authorization_code".parse::<GrantType>().unwrap(),
            GrantType::AuthorizationCode
        );
        assert_eq!("password".parse::<GrantType>().unwrap(), GrantType::Password);
        assert_eq!(
            "client_credentials".parse::<GrantType>().unwrap(),
            GrantType::ClientCredentials
        );
        assert!(matches!(
            "refresh_token".parse::<GrantType>(),
            Err(AuthError::UnsupportedGrantType { .. })
        ));
    }

    #[test]
    fn test_token_response_shape() {
        let response = TokenResponse::bearer("abc", 604_800);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["expires_in"], 604_800);
    }

    #[test]
    fn test_error_response_hides_server_details() {
        let err = AuthError::storage("connection pool exhausted");
        let body = OAuthErrorResponse::from(&err);
        assert_eq!(body.error, "server_error");
        assert!(body.error_description.is_none());
    }

    #[test]
    fn test_error_response_describes_client_errors() {
        let err = AuthError::invalid_code("already consumed");
        let body = OAuthErrorResponse::from(&err);
        assert_eq!(body.error, "invalid_grant");
        assert_eq!(
            body.error_description.as_deref(),
            Some("Invalid code: already consumed")
        );
    }

    #[test]
    fn test_token_request_form_decoding() {
        let request: TokenRequest = serde_json::from_str(
            r#"{
                "grant_type": "authorization_code",
                "code": "XYZ",
                "redirect_uri": "http://cb/"
            }"#,
        )
        .unwrap();
        assert_eq!(request.grant_type, "authorization_code");
        assert_eq!(request.code.as_deref(), Some("XYZ"));
        assert!(request.username.is_none());
    }
}

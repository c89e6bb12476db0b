//! HTTP rendering of [`AuthError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::AuthError;
use crate::oauth::OAuthErrorResponse;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        if self.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = Json(OAuthErrorResponse::from(&self));
        (status, body).into_response()
    }
}

fn status_code(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidCode { .. }
        | AuthError::InvalidRequest { .. }
        | AuthError::InvalidRedirectUri { .. }
        | AuthError::UnsupportedResponseType { .. }
        | AuthError::UnsupportedGrantType { .. } => StatusCode::BAD_REQUEST,
        AuthError::InvalidCredentials { .. }
        | AuthError::InvalidToken { .. }
        | AuthError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AuthError::Forbidden { .. } | AuthError::AccessDenied { .. } => StatusCode::FORBIDDEN,
        AuthError::NotFound { .. } => StatusCode::NOT_FOUND,
        AuthError::Storage { .. }
        | AuthError::Configuration { .. }
        | AuthError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

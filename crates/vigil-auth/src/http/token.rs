//! Token endpoint.

use axum::Form;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};

use crate::error::AuthError;
use crate::oauth::TokenRequest;
use crate::strategy::Credentials;

use super::{AppState, extract};

/// `POST /oauth/token`.
///
/// The client authenticates with a Basic `Authorization` header or with
/// `client_id`/`client_secret` form fields; the header wins when both
/// are present. The grant-specific work happens in the protocol engine.
pub async fn token_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(request): Form<TokenRequest>,
) -> Response {
    let credentials = Credentials {
        basic: extract::basic_pair(&headers),
        body_client: request
            .client_id
            .clone()
            .zip(request.client_secret.clone()),
        ..Credentials::default()
    };

    let client = match state.client_chain.authenticate(&credentials).await {
        Ok(principal) => match principal.as_client() {
            Some(client) => client.clone(),
            None => {
                return AuthError::invalid_credentials("client authentication required")
                    .into_response();
            }
        },
        Err(err) => return err.into_response(),
    };

    match state.service.exchange(&client, &request).await {
        Ok(response) => {
            tracing::info!(
                client_id = %client.client_id,
                grant_type = %request.grant_type,
                "token issued"
            );
            // Token responses must never be cached.
            (
                [
                    (header::CACHE_CONTROL, "no-store"),
                    (header::PRAGMA, "no-cache"),
                ],
                Json(response),
            )
                .into_response()
        }
        Err(err) => {
            tracing::debug!(
                client_id = %client.client_id,
                grant_type = %request.grant_type,
                error = %err,
                "token request failed"
            );
            err.into_response()
        }
    }
}

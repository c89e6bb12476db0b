//! Bearer-protected identity endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::strategy::Principal;

use super::{AppState, extract};

/// `GET /userinfo`.
///
/// Resolves the bearer token and returns the identity it stands for: a
/// user document for user tokens, a client document for tokens issued
/// through the client_credentials grant.
pub async fn userinfo_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let credentials = extract::bearer_credentials(&headers);
    let principal = match state.bearer_chain.authenticate(&credentials).await {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };

    let body = match &principal {
        Principal::User { user, .. } => json!({
            "sub": user.id,
            "email": user.email,
            "name": user.display_name(),
            "admin": user.admin,
        }),
        Principal::Client { client, .. } => json!({
            "sub": client.id,
            "client_id": client.client_id,
            "name": client.name,
        }),
    };

    Json(body).into_response()
}

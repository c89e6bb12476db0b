//! Consent decision endpoint.

use axum::Form;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AuthError;

use super::{AppState, extract};

/// Decision form posted from the consent page.
#[derive(Debug, Deserialize)]
pub struct DecisionForm {
    /// The transaction being decided.
    pub transaction_id: Uuid,
    /// `true` when the user pressed Deny.
    pub cancel: Option<bool>,
}

/// `POST /oauth/authorize/decision`.
///
/// Consumes the transaction either way. The deciding user must be the
/// one who opened it; anyone else sees not-found, and the transaction
/// stays available to its owner.
pub async fn decision_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<DecisionForm>,
) -> Response {
    let credentials = extract::session_credentials(&jar, &headers);
    let user = match state.session_chain.authenticate(&credentials).await {
        Ok(principal) => match principal.as_user() {
            Some(user) => user.clone(),
            None => return AuthError::unauthorized("login required").into_response(),
        },
        Err(err) if err.is_server_error() => return err.into_response(),
        Err(_) => return AuthError::unauthorized("login required").into_response(),
    };

    let cancel = form.cancel.unwrap_or(false);
    match state
        .service
        .decide(&user, form.transaction_id, cancel)
        .await
    {
        Ok(url) => Redirect::to(&url).into_response(),
        Err(err) => err.into_response(),
    }
}

//! Authorization endpoint.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::oauth::{AuthorizationRequest, AuthorizeOutcome};
use crate::types::User;

use super::login::escape_html;
use super::{AppState, extract};

/// `GET /oauth/authorize`.
///
/// Requires a logged-in user; anonymous requests are bounced to the
/// login form with the full original URL carried so the flow resumes
/// after login. Authenticated requests go to the protocol engine, which
/// either redirects straight back to the client or asks for consent.
pub async fn authorize_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    uri: Uri,
    Query(request): Query<AuthorizationRequest>,
) -> Response {
    let credentials = extract::session_credentials(&jar, &headers);
    let user = match state.session_chain.authenticate(&credentials).await {
        Ok(principal) => match principal.as_user() {
            Some(user) => user.clone(),
            None => return Redirect::to(&login_redirect_url(&uri)).into_response(),
        },
        Err(err) if err.is_server_error() => return err.into_response(),
        Err(_) => return Redirect::to(&login_redirect_url(&uri)).into_response(),
    };

    match state.service.authorize(&user, &request).await {
        Ok(AuthorizeOutcome::Redirect(url)) => Redirect::to(&url).into_response(),
        Ok(AuthorizeOutcome::ConsentRequired {
            transaction_id,
            client_name,
            ..
        }) => Html(consent_page(&user, &client_name, transaction_id)).into_response(),
        Err(err) => err.into_response(),
    }
}

fn login_redirect_url(uri: &Uri) -> String {
    let original: String = url::form_urlencoded::byte_serialize(uri.to_string().as_bytes()).collect();
    format!("/login?redirect_uri={original}")
}

fn consent_page(user: &User, client_name: &str, transaction_id: Uuid) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Authorize {client}</title></head>\n<body>\n\
         <h1>Authorize {client}</h1>\n\
         <p>Hi {user}. <strong>{client}</strong> is requesting access to your account.</p>\n\
         <form method=\"post\" action=\"/oauth/authorize/decision\">\n\
         <input type=\"hidden\" name=\"transaction_id\" value=\"{txn}\">\n\
         <button type=\"submit\" name=\"allow\" value=\"true\">Allow</button>\n\
         <button type=\"submit\" name=\"cancel\" value=\"true\">Deny</button>\n\
         </form>\n</body>\n</html>\n",
        client = escape_html(client_name),
        user = escape_html(&user.display_name()),
        txn = transaction_id,
    )
}

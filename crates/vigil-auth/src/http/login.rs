//! Login form and session issuance.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::Deserialize;

use crate::envelope::EnvelopeKind;

use super::{AppState, SESSION_COOKIE};

/// Query parameters on the login form.
#[derive(Debug, Deserialize, Default)]
pub struct LoginQuery {
    /// Where to send the user once logged in (typically back to
    /// `/oauth/authorize` with its original query string).
    pub redirect_uri: Option<String>,
    /// Set after a failed attempt so the form can show a notice.
    pub login_failed: Option<bool>,
}

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Login email.
    pub email: String,
    /// Plaintext password, verified against the stored hash.
    pub password: String,
    /// Carried through from the form so the round trip survives.
    pub redirect_uri: Option<String>,
}

/// `GET /login` - renders the login form.
pub async fn login_form(Query(query): Query<LoginQuery>) -> Html<String> {
    Html(login_page(
        query.redirect_uri.as_deref(),
        query.login_failed.unwrap_or(false),
    ))
}

/// `POST /login` - verifies the password and opens a session.
///
/// On success a signed session envelope is set as a cookie and the user
/// is sent to the carried `redirect_uri` (or `/`). On failure the user
/// is sent back to the form with `login_failed=true`; the reason is not
/// disclosed.
pub async fn submit_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let credentials = crate::strategy::Credentials {
        form_login: Some((form.email.clone(), form.password.clone())),
        ..Default::default()
    };

    let principal = match state.login_chain.authenticate(&credentials).await {
        Ok(principal) => principal,
        Err(err) if err.is_server_error() => return err.into_response(),
        Err(_) => {
            tracing::debug!("login attempt failed");
            return Redirect::to(&failed_login_url(form.redirect_uri.as_deref())).into_response();
        }
    };

    let Some(user) = principal.as_user() else {
        return Redirect::to(&failed_login_url(form.redirect_uri.as_deref())).into_response();
    };

    let session = match state
        .envelope
        .issue(EnvelopeKind::Session, &user.id, state.session_lifetime)
    {
        Ok(session) => session,
        Err(err) => return err.into_response(),
    };

    tracing::info!(user_id = %user.id, "login session opened");

    let cookie = Cookie::build((SESSION_COOKIE, session))
        .path("/")
        .http_only(true)
        .build();
    let target = form.redirect_uri.as_deref().unwrap_or("/");
    (jar.add(cookie), Redirect::to(target)).into_response()
}

fn failed_login_url(redirect_uri: Option<&str>) -> String {
    match redirect_uri {
        Some(uri) => format!("/login?login_failed=true&redirect_uri={}", urlencode(uri)),
        None => "/login?login_failed=true".to_string(),
    }
}

fn urlencode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn login_page(redirect_uri: Option<&str>, failed: bool) -> String {
    let notice = if failed {
        "<p class=\"error\">Login failed. Check your email and password.</p>"
    } else {
        ""
    };
    let carried = redirect_uri
        .map(|uri| {
            format!(
                "<input type=\"hidden\" name=\"redirect_uri\" value=\"{}\">",
                escape_html(uri)
            )
        })
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Sign in</title></head>\n<body>\n\
         <h1>Sign in</h1>\n{notice}\n\
         <form method=\"post\" action=\"/login\">\n\
         {carried}\n\
         <label>Email <input type=\"email\" name=\"email\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">Sign in</button>\n\
         </form>\n</body>\n</html>\n"
    )
}

pub(super) fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_login_url_carries_redirect() {
        let url = failed_login_url(Some("/oauth/authorize?client_id=app"));
        assert!(url.starts_with("/login?login_failed=true&redirect_uri="));
        assert!(url.contains("%2Foauth%2Fauthorize%3Fclient_id%3Dapp"));

        assert_eq!(failed_login_url(None), "/login?login_failed=true");
    }

    #[test]
    fn test_login_page_shows_failure_notice() {
        assert!(login_page(None, true).contains("Login failed"));
        assert!(!login_page(None, false).contains("Login failed"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>\"&\"</script>"),
            "&lt;script&gt;&quot;&amp;&quot;&lt;/script&gt;"
        );
    }
}

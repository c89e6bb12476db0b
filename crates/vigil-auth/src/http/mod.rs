//! Axum HTTP surface for the authorization server.
//!
//! Endpoints:
//!
//! - `GET /login`, `POST /login` - login form and session issuance
//! - `GET /oauth/authorize` - authorization endpoint (consent prompt)
//! - `POST /oauth/authorize/decision` - consent decision
//! - `POST /oauth/token` - token endpoint
//! - `GET /userinfo` - bearer-protected identity document
//!
//! Handlers stay thin: they extract credentials, run the endpoint's
//! [`StrategyChain`], and hand off to [`OAuthService`]. Error bodies are
//! rendered by the [`error`] module.

pub mod authorize;
pub mod decision;
pub mod error;
pub mod extract;
pub mod login;
pub mod token;
pub mod userinfo;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};

use crate::envelope::EnvelopeSigner;
use crate::oauth::{OAuthService, TokenIssuer};
use crate::storage::{ClientStorage, UserStorage};
use crate::strategy::{
    BearerStrategy, ClientSecretSource, ClientSecretStrategy, PasswordSource,
    SessionTokenStrategy, StrategyChain, UserPasswordStrategy,
};

/// Name of the session cookie set at login.
pub const SESSION_COOKIE: &str = "vigil_session";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Protocol engine.
    pub service: Arc<OAuthService>,
    /// Envelope signer, used to mint session values at login.
    pub envelope: Arc<EnvelopeSigner>,
    /// Lifetime of login sessions.
    pub session_lifetime: Duration,
    /// Chain for browser endpoints (session cookie).
    pub session_chain: StrategyChain,
    /// Chain for the login form.
    pub login_chain: StrategyChain,
    /// Chain for the token endpoint (client Basic header, then body).
    pub client_chain: StrategyChain,
    /// Chain for bearer-protected resources.
    pub bearer_chain: StrategyChain,
}

impl AppState {
    /// Assembles handler state and the per-endpoint strategy chains.
    #[must_use]
    pub fn new(
        service: Arc<OAuthService>,
        issuer: Arc<TokenIssuer>,
        envelope: Arc<EnvelopeSigner>,
        users: Arc<dyn UserStorage>,
        clients: Arc<dyn ClientStorage>,
        session_lifetime: Duration,
    ) -> Self {
        let session_chain = StrategyChain::new(vec![Arc::new(SessionTokenStrategy::new(
            Arc::clone(&envelope),
            Arc::clone(&users),
        ))]);
        let login_chain = StrategyChain::new(vec![Arc::new(UserPasswordStrategy::new(
            Arc::clone(&users),
            PasswordSource::Form,
        ))]);
        let client_chain = StrategyChain::new(vec![
            Arc::new(ClientSecretStrategy::new(
                Arc::clone(&clients),
                ClientSecretSource::Basic,
            )),
            Arc::new(ClientSecretStrategy::new(
                Arc::clone(&clients),
                ClientSecretSource::Body,
            )),
        ]);
        let bearer_chain = StrategyChain::new(vec![Arc::new(BearerStrategy::new(
            issuer, users, clients,
        ))]);

        Self {
            service,
            envelope,
            session_lifetime,
            session_chain,
            login_chain,
            client_chain,
            bearer_chain,
        }
    }
}

/// Builds the authorization server router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/login", get(login::login_form).post(login::submit_login))
        .route("/oauth/authorize", get(authorize::authorize_handler))
        .route(
            "/oauth/authorize/decision",
            post(decision::decision_handler),
        )
        .route("/oauth/token", post(token::token_handler))
        .route("/userinfo", get(userinfo::userinfo_handler))
        .with_state(state)
}

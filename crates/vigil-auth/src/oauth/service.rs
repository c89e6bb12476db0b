//! Protocol engine.
//!
//! `OAuthService` orchestrates the authorize/decision transaction pair
//! and the token endpoint dispatch. It owns no request state itself;
//! transactions live in a keyed store and are consumed exactly once.

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::AuthResult;
use crate::error::AuthError;
use crate::oauth::authorize::{self, AuthorizationRequest, ResponseType};
use crate::oauth::exchange;
use crate::oauth::grant;
use crate::oauth::issuer::TokenIssuer;
use crate::oauth::token::{GrantType, TokenRequest, TokenResponse};
use crate::oauth::transaction::Transaction;
use crate::storage::{ClientStorage, TokenStorage, TransactionStorage, UserStorage};
use crate::types::{Client, User};

/// Result of a validated authorization request.
#[derive(Debug, Clone)]
pub enum AuthorizeOutcome {
    /// Consent was bypassed (trusted client or prior live token); redirect
    /// straight back to the client with the issued artifact.
    Redirect(String),

    /// The user must approve the request; render a consent prompt bound
    /// to the transaction.
    ConsentRequired {
        /// Transaction to echo back on the decision endpoint.
        transaction_id: Uuid,
        /// Public client id, for display.
        client_id: String,
        /// Client application name, for display.
        client_name: String,
    },
}

/// OAuth 2.0 protocol engine.
pub struct OAuthService {
    clients: Arc<dyn ClientStorage>,
    users: Arc<dyn UserStorage>,
    tokens: Arc<dyn TokenStorage>,
    transactions: Arc<dyn TransactionStorage>,
    issuer: Arc<TokenIssuer>,
    transaction_lifetime: Duration,
}

impl OAuthService {
    /// Creates a new protocol engine.
    #[must_use]
    pub fn new(
        clients: Arc<dyn ClientStorage>,
        users: Arc<dyn UserStorage>,
        tokens: Arc<dyn TokenStorage>,
        transactions: Arc<dyn TransactionStorage>,
        issuer: Arc<TokenIssuer>,
        transaction_lifetime: Duration,
    ) -> Self {
        Self {
            clients,
            users,
            tokens,
            transactions,
            issuer,
            transaction_lifetime,
        }
    }

    /// Returns the token/code issuer.
    #[must_use]
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Handles `GET /oauth/authorize` for an authenticated user.
    ///
    /// Validates the client and redirect URI, then either auto-approves
    /// (trusted client, or the user already holds a live token for this
    /// client) or opens a transaction and asks for consent.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedResponseType` for unknown response types,
    /// `NotFound` for unknown clients, and `InvalidRedirectUri` when the
    /// supplied redirect URI is not byte-for-byte the registered one. No
    /// transaction is created on any of these.
    pub async fn authorize(
        &self,
        user: &User,
        request: &AuthorizationRequest,
    ) -> AuthResult<AuthorizeOutcome> {
        let response_type: ResponseType = request.response_type.parse()?;

        let client = self
            .clients
            .find_by_client_id(&request.client_id)
            .await?
            .ok_or_else(|| {
                AuthError::not_found("Client", format!("no client {}", request.client_id))
            })?;

        // Exact string equality, no normalization. Relaxing this is a
        // security-relevant behavior change.
        if client.redirect_uri != request.redirect_uri {
            tracing::debug!(
                client_id = %client.client_id,
                "authorize rejected: redirect URI mismatch"
            );
            return Err(AuthError::invalid_redirect_uri(format!(
                "redirect URI {} does not match registration",
                request.redirect_uri
            )));
        }

        let transaction = Transaction::new(
            &client,
            user,
            &request.redirect_uri,
            response_type,
            self.transaction_lifetime,
        );

        if client.trusted || self.has_live_token(user, &client).await? {
            tracing::debug!(client_id = %client.client_id, "consent bypassed");
            let redirect = grant::issue_grant(&self.issuer, &transaction).await?;
            return Ok(AuthorizeOutcome::Redirect(redirect));
        }

        self.transactions.insert(&transaction).await?;
        tracing::debug!(
            client_id = %client.client_id,
            transaction_id = %transaction.id,
            "consent required"
        );

        Ok(AuthorizeOutcome::ConsentRequired {
            transaction_id: transaction.id,
            client_id: client.client_id,
            client_name: client.name,
        })
    }

    /// Handles `POST /oauth/authorize/decision`.
    ///
    /// The transaction is consumed whatever the outcome; replaying the
    /// same `transaction_id` fails.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transaction is unknown, already
    /// consumed, or owned by another user, and `InvalidRequest` if it
    /// has expired.
    pub async fn decide(
        &self,
        user: &User,
        transaction_id: Uuid,
        cancel: bool,
    ) -> AuthResult<String> {
        let transaction = self
            .transactions
            .take(transaction_id, &user.id)
            .await?
            .ok_or_else(|| {
                AuthError::not_found("Transaction", format!("no transaction {transaction_id}"))
            })?;

        if transaction.is_expired() {
            return Err(AuthError::invalid_request("transaction expired"));
        }

        if cancel {
            tracing::debug!(transaction_id = %transaction.id, "authorization denied by user");
            return authorize::denied_redirect_url(&transaction.redirect_uri);
        }

        grant::issue_grant(&self.issuer, &transaction).await
    }

    /// Handles `POST /oauth/token` for an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedGrantType` for unknown grant types,
    /// `InvalidRequest` for missing grant-specific fields, and the
    /// exchange handler's errors otherwise.
    pub async fn exchange(
        &self,
        client: &Client,
        request: &TokenRequest,
    ) -> AuthResult<TokenResponse> {
        let grant_type: GrantType = request.grant_type.parse()?;

        let token = match grant_type {
            GrantType::AuthorizationCode => {
                let code = request
                    .code
                    .as_deref()
                    .ok_or_else(|| AuthError::invalid_request("missing code"))?;
                let redirect_uri = request
                    .redirect_uri
                    .as_deref()
                    .ok_or_else(|| AuthError::invalid_request("missing redirect_uri"))?;
                exchange::authorization_code(&self.issuer, client, code, redirect_uri).await?
            }
            GrantType::Password => {
                let username = request
                    .username
                    .as_deref()
                    .ok_or_else(|| AuthError::invalid_request("missing username"))?;
                let password = request
                    .password
                    .as_deref()
                    .ok_or_else(|| AuthError::invalid_request("missing password"))?;
                exchange::password(&self.issuer, self.users.as_ref(), client, username, password)
                    .await?
            }
            GrantType::ClientCredentials => {
                exchange::client_credentials(&self.issuer, client).await?
            }
        };

        Ok(TokenResponse::bearer(
            token.value,
            self.issuer.token_expires_in(),
        ))
    }

    /// Returns `true` if the user already holds a live token for this
    /// client. Expired leftovers do not count.
    async fn has_live_token(&self, user: &User, client: &Client) -> AuthResult<bool> {
        let tokens = self
            .tokens
            .find_by_user_and_client(&user.id, &client.id)
            .await?;
        Ok(tokens.iter().any(|t| self.issuer.is_token_live(&t.value)))
    }
}

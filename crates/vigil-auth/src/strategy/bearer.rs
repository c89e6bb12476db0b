//! Bearer token verification for protected resources.

use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthResult;
use crate::error::AuthError;
use crate::oauth::TokenIssuer;
use crate::storage::{ClientStorage, UserStorage};
use crate::types::AccessToken;

use super::{AuthStrategy, Credentials, Principal};

/// Resolves a bearer token to the user it was issued for, or to the
/// client when the token carries no user (client_credentials grant).
pub struct BearerStrategy {
    issuer: Arc<TokenIssuer>,
    users: Arc<dyn UserStorage>,
    clients: Arc<dyn ClientStorage>,
}

impl BearerStrategy {
    /// Creates a new bearer strategy.
    #[must_use]
    pub fn new(
        issuer: Arc<TokenIssuer>,
        users: Arc<dyn UserStorage>,
        clients: Arc<dyn ClientStorage>,
    ) -> Self {
        Self {
            issuer,
            users,
            clients,
        }
    }

    async fn resolve(&self, credentials: &Credentials) -> AuthResult<(AccessToken, Principal)> {
        let value = credentials
            .bearer
            .as_deref()
            .ok_or_else(|| AuthError::unauthorized("no bearer token presented"))?;

        let token = self.issuer.resolve_token(value).await?;

        if let Some(user_id) = &token.user_id {
            let user = self
                .users
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| AuthError::not_found("User", "token user no longer exists"))?;
            return Ok((token.clone(), Principal::user(user)));
        }

        let client_id = token
            .client_id
            .as_deref()
            .ok_or_else(|| AuthError::internal("token carries neither user nor client"))?;
        let client = self
            .clients
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| AuthError::not_found("Client", "token client no longer exists"))?;
        Ok((token, Principal::client(client)))
    }
}

#[async_trait]
impl AuthStrategy for BearerStrategy {
    fn name(&self) -> &'static str {
        "bearer"
    }

    async fn verify(&self, credentials: &Credentials) -> AuthResult<Principal> {
        let (_, principal) = self.resolve(credentials).await?;
        Ok(principal)
    }
}

/// Like [`BearerStrategy`], but only admits admin users.
///
/// Client-only tokens never pass, whatever the client's standing: the
/// admin flag lives on users.
pub struct BearerAdminStrategy {
    inner: BearerStrategy,
}

impl BearerAdminStrategy {
    /// Creates a new admin-gated bearer strategy.
    #[must_use]
    pub fn new(
        issuer: Arc<TokenIssuer>,
        users: Arc<dyn UserStorage>,
        clients: Arc<dyn ClientStorage>,
    ) -> Self {
        Self {
            inner: BearerStrategy::new(issuer, users, clients),
        }
    }
}

#[async_trait]
impl AuthStrategy for BearerAdminStrategy {
    fn name(&self) -> &'static str {
        "bearer-admin"
    }

    async fn verify(&self, credentials: &Credentials) -> AuthResult<Principal> {
        let (_, principal) = self.inner.resolve(credentials).await?;
        match &principal {
            Principal::User { user, .. } if user.admin => Ok(principal),
            Principal::User { .. } => Err(AuthError::forbidden("user is not an administrator")),
            Principal::Client { .. } => Err(AuthError::forbidden(
                "client-only tokens cannot act as administrators",
            )),
        }
    }
}

//! Client id/secret verification for the token endpoint.

use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthResult;
use crate::error::AuthError;
use crate::password;
use crate::storage::ClientStorage;

use super::{AuthStrategy, Credentials, Principal};

/// Where the client id/secret pair is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSecretSource {
    /// The HTTP Basic `Authorization` header.
    Basic,
    /// `client_id`/`client_secret` fields in the request body.
    Body,
}

/// Verifies a client's public id and secret against the client store.
///
/// The token endpoint runs this twice, header first, so that clients may
/// authenticate either way.
pub struct ClientSecretStrategy {
    clients: Arc<dyn ClientStorage>,
    source: ClientSecretSource,
}

impl ClientSecretStrategy {
    /// Creates a strategy reading from the given source.
    #[must_use]
    pub fn new(clients: Arc<dyn ClientStorage>, source: ClientSecretSource) -> Self {
        Self { clients, source }
    }
}

#[async_trait]
impl AuthStrategy for ClientSecretStrategy {
    fn name(&self) -> &'static str {
        match self.source {
            ClientSecretSource::Basic => "client-secret-basic",
            ClientSecretSource::Body => "client-secret-body",
        }
    }

    async fn verify(&self, credentials: &Credentials) -> AuthResult<Principal> {
        let pair = match self.source {
            ClientSecretSource::Basic => credentials.basic.as_ref(),
            ClientSecretSource::Body => credentials.body_client.as_ref(),
        };
        let (client_id, secret) =
            pair.ok_or_else(|| AuthError::unauthorized("no client credentials presented"))?;

        let client = self
            .clients
            .find_by_client_id(client_id)
            .await?
            .ok_or_else(|| AuthError::invalid_credentials("unknown client"))?;

        if !password::verify_client_secret(&client.client_secret, secret)? {
            return Err(AuthError::invalid_credentials("wrong client secret"));
        }

        Ok(Principal::client(client))
    }
}

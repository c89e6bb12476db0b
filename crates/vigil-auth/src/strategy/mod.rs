//! Credential verification strategies.
//!
//! Each strategy resolves one kind of credential to a [`Principal`] or
//! fails. Endpoints run a fixed, ordered [`StrategyChain`]; the first
//! strategy to return a principal wins, and a strategy that does not
//! find its kind of credential in the input simply passes. Verification
//! failures never escape the chain as panics; they surface as "no
//! principal" and the transport decides between a login redirect and a
//! 401 body.
//!
//! The set of strategies is fixed at assembly time; nothing registers
//! strategies at runtime.

pub mod bearer;
pub mod client;
pub mod password;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthResult;
use crate::error::AuthError;
use crate::types::{Client, User};

pub use bearer::{BearerAdminStrategy, BearerStrategy};
pub use client::{ClientSecretSource, ClientSecretStrategy};
pub use password::{PasswordSource, UserPasswordStrategy};
pub use session::SessionTokenStrategy;

/// The authenticated entity resulting from a successful verification.
#[derive(Debug, Clone)]
pub enum Principal {
    /// An end user, with the granted scope.
    User {
        /// The resolved user.
        user: User,
        /// Granted scope (the engine grants the wildcard scope).
        scope: &'static str,
    },
    /// A client acting on its own behalf, with the granted scope.
    Client {
        /// The resolved client.
        client: Client,
        /// Granted scope.
        scope: &'static str,
    },
}

impl Principal {
    /// Wraps a user with the wildcard scope.
    #[must_use]
    pub fn user(user: User) -> Self {
        Self::User { user, scope: "*" }
    }

    /// Wraps a client with the wildcard scope.
    #[must_use]
    pub fn client(client: Client) -> Self {
        Self::Client { client, scope: "*" }
    }

    /// Returns the user, if this principal is one.
    #[must_use]
    pub fn as_user(&self) -> Option<&User> {
        match self {
            Self::User { user, .. } => Some(user),
            Self::Client { .. } => None,
        }
    }

    /// Returns the client, if this principal is one.
    #[must_use]
    pub fn as_client(&self) -> Option<&Client> {
        match self {
            Self::Client { client, .. } => Some(client),
            Self::User { .. } => None,
        }
    }
}

/// Credentials extracted from one request, in transport-neutral form.
///
/// Transports (HTTP header, request body, cookie, login form) fill the
/// fields they carry; each strategy reads the field it understands.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Login form email/password.
    pub form_login: Option<(String, String)>,

    /// HTTP Basic `Authorization` header pair.
    pub basic: Option<(String, String)>,

    /// `client_id`/`client_secret` embedded in the request body.
    pub body_client: Option<(String, String)>,

    /// Bearer token from the `Authorization` header.
    pub bearer: Option<String>,

    /// Signed session token from a cookie or the `Authorization` header.
    pub session_token: Option<String>,
}

/// A named verification strategy.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// The strategy's name, used in logs.
    fn name(&self) -> &'static str;

    /// Attempts to resolve the credentials to a principal.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the input carries no credential this
    /// strategy understands, and a specific error (`InvalidCredentials`,
    /// `InvalidToken`, `Forbidden`, `NotFound`) when it does but
    /// verification fails.
    async fn verify(&self, credentials: &Credentials) -> AuthResult<Principal>;
}

/// A fixed, ordered list of strategies for one endpoint.
#[derive(Clone)]
pub struct StrategyChain {
    strategies: Vec<Arc<dyn AuthStrategy>>,
}

impl StrategyChain {
    /// Creates a chain from an ordered list of strategies.
    #[must_use]
    pub fn new(strategies: Vec<Arc<dyn AuthStrategy>>) -> Self {
        Self { strategies }
    }

    /// Runs the strategies in order; the first to return a principal wins.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if every strategy fails. Individual
    /// failures are logged at debug level and otherwise swallowed; the
    /// caller only learns that no principal was established.
    pub async fn authenticate(&self, credentials: &Credentials) -> AuthResult<Principal> {
        for strategy in &self.strategies {
            match strategy.verify(credentials).await {
                Ok(principal) => {
                    tracing::debug!(strategy = strategy.name(), "authentication succeeded");
                    return Ok(principal);
                }
                Err(err) if err.is_server_error() => return Err(err),
                Err(err) => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        error = %err,
                        "strategy rejected credentials"
                    );
                }
            }
        }
        Err(AuthError::unauthorized("no strategy accepted the request"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFails;

    #[async_trait]
    impl AuthStrategy for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        async fn verify(&self, _credentials: &Credentials) -> AuthResult<Principal> {
            Err(AuthError::invalid_credentials("nope"))
        }
    }

    struct AlwaysSucceeds;

    #[async_trait]
    impl AuthStrategy for AlwaysSucceeds {
        fn name(&self) -> &'static str {
            "always-succeeds"
        }

        async fn verify(&self, _credentials: &Credentials) -> AuthResult<Principal> {
            Ok(Principal::user(User::new("A", "B", "a@b", "hash")))
        }
    }

    struct StorageDown;

    #[async_trait]
    impl AuthStrategy for StorageDown {
        fn name(&self) -> &'static str {
            "storage-down"
        }

        async fn verify(&self, _credentials: &Credentials) -> AuthResult<Principal> {
            Err(AuthError::storage("backend unavailable"))
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let chain = StrategyChain::new(vec![Arc::new(AlwaysFails), Arc::new(AlwaysSucceeds)]);
        let principal = chain.authenticate(&Credentials::default()).await.unwrap();
        assert!(principal.as_user().is_some());
    }

    #[tokio::test]
    async fn test_all_failures_collapse_to_unauthorized() {
        let chain = StrategyChain::new(vec![Arc::new(AlwaysFails), Arc::new(AlwaysFails)]);
        let result = chain.authenticate(&Credentials::default()).await;
        assert!(matches!(result, Err(AuthError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_server_errors_propagate() {
        let chain = StrategyChain::new(vec![Arc::new(StorageDown), Arc::new(AlwaysSucceeds)]);
        let result = chain.authenticate(&Credentials::default()).await;
        assert!(matches!(result, Err(AuthError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_empty_chain_is_unauthorized() {
        let chain = StrategyChain::new(vec![]);
        let result = chain.authenticate(&Credentials::default()).await;
        assert!(matches!(result, Err(AuthError::Unauthorized { .. })));
    }
}

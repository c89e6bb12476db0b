//! Access token storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::AccessToken;

/// Storage operations for access tokens.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Stores a freshly issued token, keyed by its envelope value.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn create(&self, token: &AccessToken) -> AuthResult<()>;

    /// Finds a token by exact value match.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_value(&self, value: &str) -> AuthResult<Option<AccessToken>>;

    /// Finds all tokens issued to a client on behalf of a user.
    ///
    /// Used by the consent-bypass check: a user who already holds a token
    /// for the client is not asked again.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_user_and_client(
        &self,
        user_id: &str,
        client_id: &str,
    ) -> AuthResult<Vec<AccessToken>>;
}

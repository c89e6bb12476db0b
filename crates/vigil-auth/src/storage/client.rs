//! Client storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Client;

/// Storage operations for registered OAuth clients.
///
/// Clients are provisioned administratively; the protocol engine itself
/// only reads them, by internal id (code/token binding) or by public
/// `client_id` (incoming requests).
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Finds a client by its internal record id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: &str) -> AuthResult<Option<Client>>;

    /// Finds a client by its public `client_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>>;

    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if a client with the same `client_id` already
    /// exists or the storage operation fails.
    async fn create(&self, client: &Client) -> AuthResult<Client>;

    /// Updates an existing client by internal id.
    ///
    /// # Errors
    ///
    /// Returns an error if the client doesn't exist or the storage
    /// operation fails.
    async fn update(&self, id: &str, client: &Client) -> AuthResult<Client>;

    /// Deletes a client by internal id.
    ///
    /// # Errors
    ///
    /// Returns an error if the client doesn't exist or the storage
    /// operation fails.
    async fn delete(&self, id: &str) -> AuthResult<()>;
}

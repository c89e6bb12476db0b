//! Authorization code storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::AuthorizationCode;

/// Storage operations for authorization codes.
///
/// Codes are single-use: the only read operation is a consuming take.
#[async_trait]
pub trait CodeStorage: Send + Sync {
    /// Stores a freshly issued code, keyed by its envelope value.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn create(&self, code: &AuthorizationCode) -> AuthResult<()>;

    /// Atomically removes and returns the code with the given value.
    ///
    /// This must be a single atomic store operation: of two concurrent
    /// takes of the same value, exactly one observes the code and the
    /// other observes `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn take_by_value(&self, value: &str) -> AuthResult<Option<AuthorizationCode>>;
}

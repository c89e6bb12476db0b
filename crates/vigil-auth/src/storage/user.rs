//! User storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::User;

/// Storage operations for end users.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Finds a user by record id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: &str) -> AuthResult<Option<User>>;

    /// Finds a user by email address (the login name).
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if a user with the same email already exists or
    /// the storage operation fails.
    async fn create(&self, user: &User) -> AuthResult<User>;

    /// Updates an existing user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the user doesn't exist or the storage
    /// operation fails.
    async fn update(&self, id: &str, user: &User) -> AuthResult<User>;

    /// Deletes a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the user doesn't exist or the storage
    /// operation fails.
    async fn delete(&self, id: &str) -> AuthResult<()>;
}

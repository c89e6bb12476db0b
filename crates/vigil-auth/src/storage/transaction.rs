//! Authorization transaction storage trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::AuthResult;
use crate::oauth::Transaction;

/// Storage operations for in-flight authorization transactions.
///
/// A transaction lives for exactly one authorize/decision round trip.
/// There is no plain lookup: the decision endpoint consumes it with
/// [`TransactionStorage::take`], so a replayed `transaction_id` observes
/// `None`.
#[async_trait]
pub trait TransactionStorage: Send + Sync {
    /// Stores a new transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn insert(&self, transaction: &Transaction) -> AuthResult<()>;

    /// Atomically removes and returns the transaction, if it exists and
    /// belongs to `owner_user_id`.
    ///
    /// A transaction owned by a different user is left in place and
    /// reported as `None`; the caller learns nothing about its existence.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn take(&self, id: Uuid, owner_user_id: &str) -> AuthResult<Option<Transaction>>;

    /// Deletes expired transactions and returns how many were removed.
    ///
    /// Abandoned consent prompts leave transactions behind; this is the
    /// storage-hygiene sweep.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleanup operation fails.
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

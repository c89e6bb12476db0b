//! In-memory storage backend.
//!
//! Backs the default server assembly and the test suite. Each store is a
//! `tokio::sync::RwLock` over a `HashMap`; the consuming operations
//! (`take_by_value`, `take`) remove under a single write-lock acquisition,
//! which gives the single-use guarantee under concurrent duplicates.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::AuthResult;
use crate::error::AuthError;
use crate::oauth::Transaction;
use crate::types::{AccessToken, AuthorizationCode, Client, User};

use super::{ClientStorage, CodeStorage, TokenStorage, TransactionStorage, UserStorage};

/// In-memory client store, keyed by internal id.
#[derive(Default)]
pub struct InMemoryClientStorage {
    clients: RwLock<HashMap<String, Client>>,
}

impl InMemoryClientStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStorage for InMemoryClientStorage {
    async fn find_by_id(&self, id: &str) -> AuthResult<Option<Client>> {
        Ok(self.clients.read().await.get(id).cloned())
    }

    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>> {
        Ok(self
            .clients
            .read()
            .await
            .values()
            .find(|c| c.client_id == client_id)
            .cloned())
    }

    async fn create(&self, client: &Client) -> AuthResult<Client> {
        let mut clients = self.clients.write().await;
        if clients.values().any(|c| c.client_id == client.client_id) {
            return Err(AuthError::storage(format!(
                "client_id {} already registered",
                client.client_id
            )));
        }
        clients.insert(client.id.clone(), client.clone());
        Ok(client.clone())
    }

    async fn update(&self, id: &str, client: &Client) -> AuthResult<Client> {
        let mut clients = self.clients.write().await;
        if !clients.contains_key(id) {
            return Err(AuthError::not_found("Client", format!("no client {id}")));
        }
        clients.insert(id.to_string(), client.clone());
        Ok(client.clone())
    }

    async fn delete(&self, id: &str) -> AuthResult<()> {
        self.clients
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AuthError::not_found("Client", format!("no client {id}")))
    }
}

/// In-memory user store, keyed by id.
#[derive(Default)]
pub struct InMemoryUserStorage {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStorage for InMemoryUserStorage {
    async fn find_by_id(&self, id: &str) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &User) -> AuthResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::storage(format!(
                "email {} already registered",
                user.email
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn update(&self, id: &str, user: &User) -> AuthResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(id) {
            return Err(AuthError::not_found("User", format!("no user {id}")));
        }
        users.insert(id.to_string(), user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> AuthResult<()> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AuthError::not_found("User", format!("no user {id}")))
    }
}

/// In-memory authorization code store, keyed by envelope value.
#[derive(Default)]
pub struct InMemoryCodeStorage {
    codes: RwLock<HashMap<String, AuthorizationCode>>,
}

impl InMemoryCodeStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CodeStorage for InMemoryCodeStorage {
    async fn create(&self, code: &AuthorizationCode) -> AuthResult<()> {
        self.codes
            .write()
            .await
            .insert(code.value.clone(), code.clone());
        Ok(())
    }

    async fn take_by_value(&self, value: &str) -> AuthResult<Option<AuthorizationCode>> {
        // Remove under one write-lock acquisition: the second of two
        // racing takes observes None.
        Ok(self.codes.write().await.remove(value))
    }
}

/// In-memory access token store, keyed by envelope value.
#[derive(Default)]
pub struct InMemoryTokenStorage {
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl InMemoryTokenStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStorage for InMemoryTokenStorage {
    async fn create(&self, token: &AccessToken) -> AuthResult<()> {
        self.tokens
            .write()
            .await
            .insert(token.value.clone(), token.clone());
        Ok(())
    }

    async fn find_by_value(&self, value: &str) -> AuthResult<Option<AccessToken>> {
        Ok(self.tokens.read().await.get(value).cloned())
    }

    async fn find_by_user_and_client(
        &self,
        user_id: &str,
        client_id: &str,
    ) -> AuthResult<Vec<AccessToken>> {
        Ok(self
            .tokens
            .read()
            .await
            .values()
            .filter(|t| {
                t.user_id.as_deref() == Some(user_id) && t.client_id.as_deref() == Some(client_id)
            })
            .cloned()
            .collect())
    }
}

/// In-memory transaction store, keyed by transaction id.
#[derive(Default)]
pub struct InMemoryTransactionStorage {
    transactions: RwLock<HashMap<Uuid, Transaction>>,
}

impl InMemoryTransactionStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStorage for InMemoryTransactionStorage {
    async fn insert(&self, transaction: &Transaction) -> AuthResult<()> {
        self.transactions
            .write()
            .await
            .insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn take(&self, id: Uuid, owner_user_id: &str) -> AuthResult<Option<Transaction>> {
        let mut transactions = self.transactions.write().await;
        // Ownership is checked before removal so another user's guess
        // does not consume the transaction.
        match transactions.get(&id) {
            Some(txn) if txn.user_id == owner_user_id => Ok(transactions.remove(&id)),
            _ => Ok(None),
        }
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let mut transactions = self.transactions.write().await;
        let before = transactions.len();
        transactions.retain(|_, txn| !txn.is_expired());
        Ok((before - transactions.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::ResponseType;
    use std::sync::Arc;
    use std::time::Duration;
    use time::OffsetDateTime;

    #[tokio::test]
    async fn test_client_find_by_both_ids() {
        let storage = InMemoryClientStorage::new();
        let client = Client::new("App", "app", "hash", "http://cb/");
        storage.create(&client).await.unwrap();

        assert!(storage.find_by_id(&client.id).await.unwrap().is_some());
        assert!(storage.find_by_client_id("app").await.unwrap().is_some());
        assert!(storage.find_by_client_id("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_client_id_uniqueness() {
        let storage = InMemoryClientStorage::new();
        storage
            .create(&Client::new("App", "app", "hash", "http://cb/"))
            .await
            .unwrap();

        let duplicate = Client::new("Other", "app", "hash", "http://other/");
        assert!(storage.create(&duplicate).await.is_err());
    }

    #[tokio::test]
    async fn test_user_email_lookup() {
        let storage = InMemoryUserStorage::new();
        let user = User::new("Ada", "Lovelace", "ada@example.com", "hash");
        storage.create(&user).await.unwrap();

        let found = storage.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_code_take_is_consuming() {
        let storage = InMemoryCodeStorage::new();
        let code = AuthorizationCode::new("c", "u", "http://cb/", "value-1");
        storage.create(&code).await.unwrap();

        assert!(storage.take_by_value("value-1").await.unwrap().is_some());
        assert!(storage.take_by_value("value-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_code_take_single_winner() {
        let storage = Arc::new(InMemoryCodeStorage::new());
        let code = AuthorizationCode::new("c", "u", "http://cb/", "value-1");
        storage.create(&code).await.unwrap();

        let a = {
            let storage = Arc::clone(&storage);
            tokio::spawn(async move { storage.take_by_value("value-1").await.unwrap() })
        };
        let b = {
            let storage = Arc::clone(&storage);
            tokio::spawn(async move { storage.take_by_value("value-1").await.unwrap() })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert!(a.is_some() ^ b.is_some());
    }

    #[tokio::test]
    async fn test_token_user_client_filter() {
        let storage = InMemoryTokenStorage::new();
        storage
            .create(&AccessToken::new(
                Some("u1".into()),
                Some("c1".into()),
                "t1",
            ))
            .await
            .unwrap();
        storage
            .create(&AccessToken::new(None, Some("c1".into()), "t2"))
            .await
            .unwrap();

        let found = storage.find_by_user_and_client("u1", "c1").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value, "t1");

        let none = storage.find_by_user_and_client("u2", "c1").await.unwrap();
        assert!(none.is_empty());
    }

    fn transaction_for(user_id: &str) -> Transaction {
        let client = Client::new("App", "app", "hash", "http://cb/");
        let mut user = User::new("Ada", "Lovelace", "ada@example.com", "hash");
        user.id = user_id.to_string();
        Transaction::new(
            &client,
            &user,
            "http://cb/",
            ResponseType::Code,
            Duration::from_secs(600),
        )
    }

    #[tokio::test]
    async fn test_transaction_take_checks_owner() {
        let storage = InMemoryTransactionStorage::new();
        let txn = transaction_for("u1");
        storage.insert(&txn).await.unwrap();

        // Wrong owner does not consume the transaction.
        assert!(storage.take(txn.id, "u2").await.unwrap().is_none());
        // The rightful owner still can.
        assert!(storage.take(txn.id, "u1").await.unwrap().is_some());
        // Replay observes not-found.
        assert!(storage.take(txn.id, "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_transaction_cleanup_expired() {
        let storage = InMemoryTransactionStorage::new();
        let mut expired = transaction_for("u1");
        expired.expires_at = OffsetDateTime::now_utc() - time::Duration::seconds(1);
        let live = transaction_for("u2");

        storage.insert(&expired).await.unwrap();
        storage.insert(&live).await.unwrap();

        assert_eq!(storage.cleanup_expired().await.unwrap(), 1);
        assert!(storage.take(live.id, "u2").await.unwrap().is_some());
    }
}

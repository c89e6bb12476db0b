//! Shared fixture for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use vigil_auth::envelope::EnvelopeSigner;
use vigil_auth::http::{AppState, router};
use vigil_auth::oauth::{OAuthService, TokenIssuer};
use vigil_auth::password;
use vigil_auth::storage::memory::{
    InMemoryClientStorage, InMemoryCodeStorage, InMemoryTokenStorage, InMemoryTransactionStorage,
    InMemoryUserStorage,
};
use vigil_auth::storage::{ClientStorage, UserStorage};
use vigil_auth::types::{Client, User};

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const CLIENT_SECRET: &str = "s3cret";
pub const USER_PASSWORD: &str = "hunter2";

pub struct TestServer {
    pub router: axum::Router,
    pub service: Arc<OAuthService>,
    pub issuer: Arc<TokenIssuer>,
    pub users: Arc<InMemoryUserStorage>,
    pub clients: Arc<InMemoryClientStorage>,
    pub client: Client,
    pub user: User,
    pub admin: User,
}

/// Builds a fully wired server over in-memory stores with one registered
/// client (untrusted unless asked), one regular user, and one admin.
pub async fn test_server(trusted_client: bool) -> TestServer {
    let clients = Arc::new(InMemoryClientStorage::new());
    let users = Arc::new(InMemoryUserStorage::new());
    let codes = Arc::new(InMemoryCodeStorage::new());
    let tokens = Arc::new(InMemoryTokenStorage::new());
    let transactions = Arc::new(InMemoryTransactionStorage::new());

    let secret_hash = password::hash_password(CLIENT_SECRET).unwrap();
    let mut client = Client::new("Example App", "example", secret_hash, "https://cb.example/done");
    client.trusted = trusted_client;
    clients.create(&client).await.unwrap();

    let password_hash = password::hash_password(USER_PASSWORD).unwrap();
    let user = User::new("Ada", "Lovelace", "ada@example.com", password_hash.clone());
    users.create(&user).await.unwrap();
    let admin = User::new("Grace", "Hopper", "grace@example.com", password_hash).admin();
    users.create(&admin).await.unwrap();

    let envelope = Arc::new(EnvelopeSigner::new(SECRET));
    let issuer = Arc::new(TokenIssuer::new(
        Arc::clone(&envelope),
        Arc::clone(&codes) as _,
        Arc::clone(&tokens) as _,
        Duration::from_secs(600),
        Duration::from_secs(3600),
    ));
    let service = Arc::new(OAuthService::new(
        Arc::clone(&clients) as _,
        Arc::clone(&users) as _,
        Arc::clone(&tokens) as _,
        transactions,
        Arc::clone(&issuer),
        Duration::from_secs(600),
    ));

    let state = AppState::new(
        Arc::clone(&service),
        Arc::clone(&issuer),
        envelope,
        Arc::clone(&users) as _,
        Arc::clone(&clients) as _,
        Duration::from_secs(3600),
    );

    TestServer {
        router: router(state),
        service,
        issuer,
        users,
        clients,
        client,
        user,
        admin,
    }
}

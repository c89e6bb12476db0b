//! Application assembly.
//!
//! Builds the storage backends, seeds them from configuration (hashing
//! plaintext secrets on the way in), and wires the engine, strategies
//! and router together.

use std::sync::Arc;

use axum::Router;
use vigil_auth::envelope::EnvelopeSigner;
use vigil_auth::http::{AppState, router};
use vigil_auth::oauth::{OAuthService, TokenIssuer};
use vigil_auth::storage::memory::{
    InMemoryClientStorage, InMemoryCodeStorage, InMemoryTokenStorage, InMemoryTransactionStorage,
    InMemoryUserStorage,
};
use vigil_auth::storage::{ClientStorage, TransactionStorage, UserStorage};
use vigil_auth::types::{Client, User};
use vigil_auth::{AuthResult, password};

use crate::config::ServerConfig;

/// Builds the router from validated configuration.
///
/// # Errors
///
/// Returns an error if hashing a seed secret or creating a seed record
/// fails (for example a duplicate client id in the file).
pub async fn build_app(config: &ServerConfig) -> AuthResult<Router> {
    let clients = Arc::new(InMemoryClientStorage::new());
    let users = Arc::new(InMemoryUserStorage::new());
    let codes = Arc::new(InMemoryCodeStorage::new());
    let tokens = Arc::new(InMemoryTokenStorage::new());
    let transactions = Arc::new(InMemoryTransactionStorage::new());

    seed(&config.seed, clients.as_ref(), users.as_ref()).await?;

    // Consumed transactions are removed by take; abandoned ones are swept
    // here once they expire.
    let sweeper = Arc::clone(&transactions);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            match sweeper.cleanup_expired().await {
                Ok(0) => {}
                Ok(count) => tracing::debug!(count, "expired transactions removed"),
                Err(e) => tracing::warn!(error = %e, "transaction sweep failed"),
            }
        }
    });

    let envelope = Arc::new(EnvelopeSigner::new(&config.auth.signing_secret));
    let issuer = Arc::new(TokenIssuer::new(
        Arc::clone(&envelope),
        Arc::clone(&codes) as _,
        Arc::clone(&tokens) as _,
        config.auth.code_lifetime,
        config.auth.token_lifetime,
    ));
    let service = Arc::new(OAuthService::new(
        Arc::clone(&clients) as _,
        Arc::clone(&users) as _,
        Arc::clone(&tokens) as _,
        transactions,
        Arc::clone(&issuer),
        config.auth.transaction_lifetime,
    ));

    let state = AppState::new(
        service,
        issuer,
        envelope,
        users,
        clients,
        config.auth.session_lifetime,
    );

    Ok(router(state))
}

async fn seed(
    seed: &crate::config::SeedConfig,
    clients: &dyn ClientStorage,
    users: &dyn UserStorage,
) -> AuthResult<()> {
    for entry in &seed.clients {
        let hash = password::hash_password(&entry.client_secret)?;
        let mut client = Client::new(&entry.name, &entry.client_id, hash, &entry.redirect_uri);
        client.trusted = entry.trusted;
        clients.create(&client).await?;
        tracing::info!(client_id = %entry.client_id, trusted = entry.trusted, "client seeded");
    }

    for entry in &seed.users {
        let hash = password::hash_password(&entry.password)?;
        let mut user = User::new(&entry.first_name, &entry.last_name, &entry.email, hash);
        user.admin = entry.admin;
        users.create(&user).await?;
        tracing::info!(email = %entry.email, admin = entry.admin, "user seeded");
    }

    Ok(())
}

//! Login-session verification.

use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthResult;
use crate::envelope::{EnvelopeKind, EnvelopeSigner};
use crate::error::AuthError;
use crate::storage::UserStorage;

use super::{AuthStrategy, Credentials, Principal};

/// Resolves a signed session value (issued at login) back to its user.
///
/// Session envelopes are self-contained: the subject is the user id, so
/// no session store is consulted, only the user store.
pub struct SessionTokenStrategy {
    envelope: Arc<EnvelopeSigner>,
    users: Arc<dyn UserStorage>,
}

impl SessionTokenStrategy {
    /// Creates a new session strategy.
    #[must_use]
    pub fn new(envelope: Arc<EnvelopeSigner>, users: Arc<dyn UserStorage>) -> Self {
        Self { envelope, users }
    }
}

#[async_trait]
impl AuthStrategy for SessionTokenStrategy {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn verify(&self, credentials: &Credentials) -> AuthResult<Principal> {
        let value = credentials
            .session_token
            .as_deref()
            .ok_or_else(|| AuthError::unauthorized("no session presented"))?;

        let claims = self.envelope.resolve(value, EnvelopeKind::Session)?;

        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AuthError::not_found("User", "session user no longer exists"))?;

        Ok(Principal::user(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::InMemoryUserStorage;
    use crate::types::User;
    use std::time::Duration;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[tokio::test]
    async fn test_session_resolves_to_user() {
        let envelope = Arc::new(EnvelopeSigner::new(SECRET));
        let users = Arc::new(InMemoryUserStorage::new());
        let user = User::new("Ada", "Lovelace", "ada@example.com", "hash");
        users.create(&user).await.unwrap();

        let value = envelope
            .issue(EnvelopeKind::Session, &user.id, Duration::from_secs(3600))
            .unwrap();

        let strategy = SessionTokenStrategy::new(envelope, users);
        let credentials = Credentials {
            session_token: Some(value),
            ..Credentials::default()
        };
        let principal = strategy.verify(&credentials).await.unwrap();
        assert_eq!(principal.as_user().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_access_token_is_not_a_session() {
        let envelope = Arc::new(EnvelopeSigner::new(SECRET));
        let users = Arc::new(InMemoryUserStorage::new());
        let user = User::new("Ada", "Lovelace", "ada@example.com", "hash");
        users.create(&user).await.unwrap();

        let value = envelope
            .issue(EnvelopeKind::Token, &user.id, Duration::from_secs(3600))
            .unwrap();

        let strategy = SessionTokenStrategy::new(envelope, users);
        let credentials = Credentials {
            session_token: Some(value),
            ..Credentials::default()
        };
        let result = strategy.verify(&credentials).await;
        assert!(matches!(result, Err(AuthError::InvalidToken { .. })));
    }

    #[tokio::test]
    async fn test_session_for_deleted_user_is_rejected() {
        let envelope = Arc::new(EnvelopeSigner::new(SECRET));
        let users = Arc::new(InMemoryUserStorage::new());

        let value = envelope
            .issue(EnvelopeKind::Session, "ghost", Duration::from_secs(3600))
            .unwrap();

        let strategy = SessionTokenStrategy::new(envelope, users);
        let credentials = Credentials {
            session_token: Some(value),
            ..Credentials::default()
        };
        let result = strategy.verify(&credentials).await;
        assert!(matches!(result, Err(AuthError::NotFound { .. })));
    }
}

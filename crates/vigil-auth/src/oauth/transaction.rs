//! In-flight authorization transaction.
//!
//! A transaction is created when `GET /oauth/authorize` validates the
//! client and is consumed by `POST /oauth/authorize/decision`: approved
//! or denied, it never outlives one round trip. Replay of a consumed
//! `transaction_id` observes not-found.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::oauth::authorize::ResponseType;
use crate::types::{Client, User};

/// Server-side record of one in-progress authorize/consent round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Identifier echoed through the consent form.
    pub id: Uuid,

    /// Internal id of the requesting client.
    pub client_id: String,

    /// Id of the authenticated user who owns this transaction.
    pub user_id: String,

    /// Redirect URI from the request (already validated against the
    /// client's registration).
    pub redirect_uri: String,

    /// The originally requested response type.
    pub response_type: ResponseType,

    /// Timestamp when the transaction was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Timestamp when the transaction expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Transaction {
    /// Creates a new transaction for an authenticated user and a
    /// validated client request.
    #[must_use]
    pub fn new(
        client: &Client,
        user: &User,
        redirect_uri: impl Into<String>,
        response_type: ResponseType,
        ttl: Duration,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            client_id: client.id.clone(),
            user_id: user.id.clone(),
            redirect_uri: redirect_uri.into(),
            response_type,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Checks whether the transaction has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Client, User};

    fn fixtures() -> (Client, User) {
        (
            Client::new("App", "app", "hash", "http://cb/"),
            User::new("Ada", "Lovelace", "ada@example.com", "hash"),
        )
    }

    #[test]
    fn test_new_transaction() {
        let (client, user) = fixtures();
        let txn = Transaction::new(
            &client,
            &user,
            "http://cb/",
            ResponseType::Code,
            Duration::from_secs(600),
        );

        assert_eq!(txn.client_id, client.id);
        assert_eq!(txn.user_id, user.id);
        assert_eq!(txn.response_type, ResponseType::Code);
        assert!(!txn.is_expired());
    }

    #[test]
    fn test_expired_transaction() {
        let (client, user) = fixtures();
        let mut txn = Transaction::new(
            &client,
            &user,
            "http://cb/",
            ResponseType::Code,
            Duration::from_secs(600),
        );
        txn.expires_at = OffsetDateTime::now_utc() - time::Duration::seconds(1);
        assert!(txn.is_expired());
    }
}

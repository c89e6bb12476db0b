//! Access token record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored access (bearer) token.
///
/// A token authorizes either a client acting for a user (`user_id` set)
/// or a client acting alone via client credentials (`user_id` unset,
/// `client_id` set). At least one of the two is always present. Tokens
/// are never mutated after creation; expiry lives in the signed envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Internal record identifier.
    pub id: String,

    /// Internal id of the client the token was issued to.
    pub client_id: Option<String>,

    /// Id of the user the token acts for, when present.
    pub user_id: Option<String>,

    /// The signed envelope string presented as the bearer token. Storage
    /// is keyed by this value.
    pub value: String,
}

impl AccessToken {
    /// Creates a new token record with a generated id.
    #[must_use]
    pub fn new(
        user_id: Option<String>,
        client_id: Option<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_id,
            user_id,
            value: value.into(),
        }
    }

    /// Returns `true` when the token authorizes a client acting alone.
    #[must_use]
    pub fn is_client_only(&self) -> bool {
        self.user_id.is_none()
    }
}

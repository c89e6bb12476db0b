//! Registered OAuth client application.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered OAuth 2.0 client application.
///
/// Clients are provisioned administratively; the protocol engine only
/// reads them. `client_id` is the public identifier used in requests,
/// while `id` is the internal record identifier that codes and tokens
/// are bound to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Internal record identifier.
    pub id: String,

    /// Human-readable application name, shown on the consent page.
    pub name: String,

    /// Public identifier used in authorization and token requests.
    /// Unique across all clients.
    pub client_id: String,

    /// Salted hash of the client secret. Never compared in plaintext.
    pub client_secret: String,

    /// The single registered callback URL. Authorization requests must
    /// match it exactly, byte for byte.
    pub redirect_uri: String,

    /// Trusted clients skip the consent prompt.
    pub trusted: bool,
}

impl Client {
    /// Creates a new client record with a generated internal id.
    ///
    /// `client_secret` must already be hashed (see [`crate::password`]).
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            trusted: false,
        }
    }

    /// Marks the client as trusted (consent prompt is skipped).
    #[must_use]
    pub fn trusted(mut self) -> Self {
        self.trusted = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_defaults() {
        let client = Client::new("My App", "my-app", "hash", "http://cb/");
        assert!(!client.trusted);
        assert!(!client.id.is_empty());
        assert_ne!(client.id, client.client_id);
    }

    #[test]
    fn test_trusted_builder() {
        let client = Client::new("My App", "my-app", "hash", "http://cb/").trusted();
        assert!(client.trusted);
    }
}

//! Authorization code record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored authorization code.
///
/// The code is bound at grant time to the client, the authorizing user
/// and the redirect URI supplied in the authorization request (not the
/// client's registered one, to support multi-redirect issuance). It is
/// consumed exactly once by the code exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationCode {
    /// Internal record identifier.
    pub id: String,

    /// Internal id of the client the code was granted to.
    pub client_id: String,

    /// Id of the user who approved the grant.
    pub user_id: String,

    /// Redirect URI the code is bound to; the exchange must present the
    /// exact same value.
    pub redirect_uri: String,

    /// The signed envelope string handed to the client. Storage is keyed
    /// by this value.
    pub value: String,
}

impl AuthorizationCode {
    /// Creates a new code record with a generated id.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        user_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.into(),
            user_id: user_id.into(),
            redirect_uri: redirect_uri.into(),
            value: value.into(),
        }
    }
}

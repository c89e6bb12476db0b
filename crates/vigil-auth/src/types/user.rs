//! End-user account.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An end user of the authorization server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Internal record identifier.
    pub id: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Email address, unique across all users; doubles as the login name.
    pub email: String,

    /// Salted hash of the password. Never stored or compared in plaintext.
    pub password: String,

    /// Administrators pass the `bearer-admin` strategy.
    pub admin: bool,
}

impl User {
    /// Creates a new user record with a generated id.
    ///
    /// `password` must already be hashed (see [`crate::password`]).
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            admin: false,
        }
    }

    /// Marks the user as an administrator.
    #[must_use]
    pub fn admin(mut self) -> Self {
        self.admin = true;
        self
    }

    /// Returns the user's display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("Ada", "Lovelace", "ada@example.com", "hash");
        assert!(!user.admin);
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_admin_builder() {
        let user = User::new("Ada", "Lovelace", "ada@example.com", "hash").admin();
        assert!(user.admin);
    }
}

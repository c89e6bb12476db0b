//! User email/password verification.

use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthResult;
use crate::error::AuthError;
use crate::password;
use crate::storage::UserStorage;

use super::{AuthStrategy, Credentials, Principal};

/// Where the email/password pair is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordSource {
    /// The login form body.
    Form,
    /// The HTTP Basic `Authorization` header.
    Basic,
}

/// Verifies a user's email and password against the user store.
///
/// Used by the login form ([`PasswordSource::Form`]) and by endpoints
/// that accept user Basic authentication ([`PasswordSource::Basic`]).
pub struct UserPasswordStrategy {
    users: Arc<dyn UserStorage>,
    source: PasswordSource,
}

impl UserPasswordStrategy {
    /// Creates a strategy reading from the given source.
    #[must_use]
    pub fn new(users: Arc<dyn UserStorage>, source: PasswordSource) -> Self {
        Self { users, source }
    }
}

#[async_trait]
impl AuthStrategy for UserPasswordStrategy {
    fn name(&self) -> &'static str {
        match self.source {
            PasswordSource::Form => "user-password-form",
            PasswordSource::Basic => "user-password-basic",
        }
    }

    async fn verify(&self, credentials: &Credentials) -> AuthResult<Principal> {
        let pair = match self.source {
            PasswordSource::Form => credentials.form_login.as_ref(),
            PasswordSource::Basic => credentials.basic.as_ref(),
        };
        let (email, candidate) = pair
            .ok_or_else(|| AuthError::unauthorized("no user credentials presented"))?;

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::invalid_credentials("unknown user"))?;

        if !password::verify_password(&user.password, candidate)? {
            return Err(AuthError::invalid_credentials("wrong password"));
        }

        Ok(Principal::user(user))
    }
}

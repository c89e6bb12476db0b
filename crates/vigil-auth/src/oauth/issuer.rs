//! Token and code issuance.
//!
//! The issuer mints signed envelope values, persists the matching record,
//! and resolves presented values back to records. Resolution always
//! verifies the envelope's signature and expiry first, independently of
//! storage: a forged or stale value is rejected before any lookup.

use std::sync::Arc;
use std::time::Duration;

use crate::AuthResult;
use crate::envelope::{EnvelopeKind, EnvelopeSigner};
use crate::error::AuthError;
use crate::storage::{CodeStorage, TokenStorage};
use crate::types::{AccessToken, AuthorizationCode};

/// Issues and resolves authorization codes and access tokens.
pub struct TokenIssuer {
    envelope: Arc<EnvelopeSigner>,
    codes: Arc<dyn CodeStorage>,
    tokens: Arc<dyn TokenStorage>,
    code_lifetime: Duration,
    token_lifetime: Duration,
}

impl TokenIssuer {
    /// Creates a new issuer.
    #[must_use]
    pub fn new(
        envelope: Arc<EnvelopeSigner>,
        codes: Arc<dyn CodeStorage>,
        tokens: Arc<dyn TokenStorage>,
        code_lifetime: Duration,
        token_lifetime: Duration,
    ) -> Self {
        Self {
            envelope,
            codes,
            tokens,
            code_lifetime,
            token_lifetime,
        }
    }

    /// Seconds an issued access token remains valid.
    #[must_use]
    pub fn token_expires_in(&self) -> u64 {
        self.token_lifetime.as_secs()
    }

    /// Issues an authorization code bound to a client, a user and the
    /// redirect URI supplied in the authorization request.
    ///
    /// # Errors
    ///
    /// Returns an error if signing or persistence fails.
    pub async fn issue_code(
        &self,
        client_id: &str,
        user_id: &str,
        redirect_uri: &str,
    ) -> AuthResult<AuthorizationCode> {
        let value = self
            .envelope
            .issue(EnvelopeKind::Code, user_id, self.code_lifetime)?;
        let code = AuthorizationCode::new(client_id, user_id, redirect_uri, value);
        self.codes.create(&code).await?;

        tracing::info!(client_id, user_id, "authorization code issued");
        Ok(code)
    }

    /// Issues an access token for a user acting through a client, or for
    /// a client acting alone.
    ///
    /// Exactly one of `user_id`/`client_id` may be unset, but not both.
    ///
    /// # Errors
    ///
    /// Returns an error if no principal is given, or if signing or
    /// persistence fails.
    pub async fn issue_token(
        &self,
        user_id: Option<&str>,
        client_id: Option<&str>,
    ) -> AuthResult<AccessToken> {
        let sub = user_id.or(client_id).ok_or_else(|| {
            AuthError::internal("token issuance requires a user or a client principal")
        })?;

        let value = self
            .envelope
            .issue(EnvelopeKind::Token, sub, self.token_lifetime)?;
        let token = AccessToken::new(
            user_id.map(str::to_string),
            client_id.map(str::to_string),
            value,
        );
        self.tokens.create(&token).await?;

        tracing::info!(
            client_id = client_id.unwrap_or("-"),
            user_id = user_id.unwrap_or("-"),
            "access token issued"
        );
        Ok(token)
    }

    /// Resolves and consumes an authorization code by value.
    ///
    /// The envelope check runs first; a value that fails signature or
    /// expiry verification never reaches storage. The storage take is
    /// atomic, so of two concurrent exchanges of the same code exactly
    /// one succeeds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCode` if the envelope is invalid or the code is
    /// unknown or already consumed.
    pub async fn resolve_code(&self, value: &str) -> AuthResult<AuthorizationCode> {
        self.envelope
            .resolve(value, EnvelopeKind::Code)
            .map_err(|_| AuthError::invalid_code("malformed or expired code"))?;

        self.codes
            .take_by_value(value)
            .await?
            .ok_or_else(|| AuthError::invalid_code("unknown or already consumed code"))
    }

    /// Resolves an access token by value.
    ///
    /// Like codes, the envelope check runs before the storage lookup.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` if the envelope is invalid or no token
    /// record matches.
    pub async fn resolve_token(&self, value: &str) -> AuthResult<AccessToken> {
        self.envelope.resolve(value, EnvelopeKind::Token)?;

        self.tokens
            .find_by_value(value)
            .await?
            .ok_or_else(|| AuthError::invalid_token("unknown token"))
    }

    /// Returns `true` if the value is a currently valid token envelope.
    ///
    /// Used by the consent-bypass check so an expired leftover token does
    /// not skip the prompt.
    #[must_use]
    pub fn is_token_live(&self, value: &str) -> bool {
        self.envelope.resolve(value, EnvelopeKind::Token).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::{InMemoryCodeStorage, InMemoryTokenStorage};

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            Arc::new(EnvelopeSigner::new("0123456789abcdef0123456789abcdef")),
            Arc::new(InMemoryCodeStorage::new()),
            Arc::new(InMemoryTokenStorage::new()),
            Duration::from_secs(600),
            Duration::from_secs(604_800),
        )
    }

    #[tokio::test]
    async fn test_issue_and_resolve_code() {
        let issuer = issuer();
        let code = issuer
            .issue_code("client-1", "user-1", "http://cb/")
            .await
            .unwrap();

        let resolved = issuer.resolve_code(&code.value).await.unwrap();
        assert_eq!(resolved.client_id, "client-1");
        assert_eq!(resolved.user_id, "user-1");
        assert_eq!(resolved.redirect_uri, "http://cb/");
    }

    #[tokio::test]
    async fn test_code_is_single_use() {
        let issuer = issuer();
        let code = issuer
            .issue_code("client-1", "user-1", "http://cb/")
            .await
            .unwrap();

        issuer.resolve_code(&code.value).await.unwrap();
        let second = issuer.resolve_code(&code.value).await;
        assert!(matches!(second, Err(AuthError::InvalidCode { .. })));
    }

    #[tokio::test]
    async fn test_forged_code_never_reaches_storage() {
        let issuer = issuer();
        let result = issuer.resolve_code("not-an-envelope").await;
        assert!(matches!(result, Err(AuthError::InvalidCode { .. })));
    }

    #[tokio::test]
    async fn test_issue_and_resolve_token() {
        let issuer = issuer();
        let token = issuer
            .issue_token(Some("user-1"), Some("client-1"))
            .await
            .unwrap();

        let resolved = issuer.resolve_token(&token.value).await.unwrap();
        assert_eq!(resolved.user_id.as_deref(), Some("user-1"));
        assert_eq!(resolved.client_id.as_deref(), Some("client-1"));
    }

    #[tokio::test]
    async fn test_client_only_token() {
        let issuer = issuer();
        let token = issuer.issue_token(None, Some("client-1")).await.unwrap();
        assert!(token.is_client_only());
    }

    #[tokio::test]
    async fn test_token_requires_a_principal() {
        let issuer = issuer();
        let result = issuer.issue_token(None, None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_session_envelope_is_not_a_token() {
        let issuer = issuer();
        let envelope = EnvelopeSigner::new("0123456789abcdef0123456789abcdef");
        let session = envelope
            .issue(EnvelopeKind::Session, "user-1", Duration::from_secs(60))
            .unwrap();

        let result = issuer.resolve_token(&session).await;
        assert!(matches!(result, Err(AuthError::InvalidToken { .. })));
    }
}

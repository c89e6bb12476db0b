//! Exchange handlers, one per grant type.
//!
//! Exchange handlers run at the token endpoint after the client has
//! authenticated (Basic header or body credentials, see
//! [`crate::strategy::client`]). Each one validates its grant-specific
//! inputs and asks the issuer for an access token.

use crate::AuthResult;
use crate::error::AuthError;
use crate::oauth::issuer::TokenIssuer;
use crate::password;
use crate::storage::UserStorage;
use crate::types::{AccessToken, Client};

/// Exchanges an authorization code for an access token.
///
/// The code must have been granted to the authenticated client and must
/// carry the exact redirect URI presented here. The code is consumed by
/// the lookup, so a second exchange of the same value fails regardless
/// of outcome.
///
/// # Errors
///
/// Returns `InvalidCode` if the code is malformed, expired, consumed,
/// or bound to a different client or redirect URI.
pub async fn authorization_code(
    issuer: &TokenIssuer,
    client: &Client,
    code_value: &str,
    redirect_uri: &str,
) -> AuthResult<AccessToken> {
    let code = issuer.resolve_code(code_value).await?;

    if code.client_id != client.id {
        tracing::debug!(client_id = %client.client_id, "code exchange by wrong client");
        return Err(AuthError::invalid_code("code was granted to another client"));
    }
    if code.redirect_uri != redirect_uri {
        tracing::debug!(client_id = %client.client_id, "code exchange with mismatched redirect URI");
        return Err(AuthError::invalid_code(
            "redirect_uri does not match the one the code was issued for",
        ));
    }

    issuer
        .issue_token(Some(&code.user_id), Some(&code.client_id))
        .await
}

/// Exchanges resource-owner credentials for an access token.
///
/// The client has already authenticated; the user's email and password
/// are verified here, and failure of either side fails the exchange.
///
/// # Errors
///
/// Returns `InvalidCredentials` if the user is unknown or the password
/// does not match.
pub async fn password(
    issuer: &TokenIssuer,
    users: &dyn UserStorage,
    client: &Client,
    username: &str,
    user_password: &str,
) -> AuthResult<AccessToken> {
    let user = users
        .find_by_email(username)
        .await?
        .ok_or_else(|| AuthError::invalid_credentials("unknown user"))?;

    if !password::verify_password(&user.password, user_password)? {
        tracing::debug!(client_id = %client.client_id, "password grant with wrong password");
        return Err(AuthError::invalid_credentials("wrong password"));
    }

    issuer.issue_token(Some(&user.id), Some(&client.id)).await
}

/// Exchanges client credentials for a client-only access token.
///
/// The client's secret was already verified by the authentication
/// strategy; the issued token carries no user.
///
/// # Errors
///
/// Returns an error if issuance fails.
pub async fn client_credentials(issuer: &TokenIssuer, client: &Client) -> AuthResult<AccessToken> {
    issuer.issue_token(None, Some(&client.id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeSigner;
    use crate::storage::memory::{InMemoryCodeStorage, InMemoryTokenStorage, InMemoryUserStorage};
    use crate::types::User;
    use std::sync::Arc;
    use std::time::Duration;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            Arc::new(EnvelopeSigner::new("0123456789abcdef0123456789abcdef")),
            Arc::new(InMemoryCodeStorage::new()),
            Arc::new(InMemoryTokenStorage::new()),
            Duration::from_secs(600),
            Duration::from_secs(3600),
        )
    }

    fn client() -> Client {
        Client::new("App", "app", "hash", "http://cb/")
    }

    #[tokio::test]
    async fn test_code_exchange_success() {
        let issuer = issuer();
        let client = client();
        let code = issuer
            .issue_code(&client.id, "user-1", "http://cb/")
            .await
            .unwrap();

        let token = authorization_code(&issuer, &client, &code.value, "http://cb/")
            .await
            .unwrap();
        assert_eq!(token.user_id.as_deref(), Some("user-1"));
        assert_eq!(token.client_id.as_deref(), Some(client.id.as_str()));
    }

    #[tokio::test]
    async fn test_code_exchange_rejects_wrong_client() {
        let issuer = issuer();
        let owner = client();
        let other = Client::new("Other", "other", "hash", "http://cb/");
        let code = issuer
            .issue_code(&owner.id, "user-1", "http://cb/")
            .await
            .unwrap();

        let result = authorization_code(&issuer, &other, &code.value, "http://cb/").await;
        assert!(matches!(result, Err(AuthError::InvalidCode { .. })));
    }

    #[tokio::test]
    async fn test_code_exchange_rejects_mismatched_redirect_uri() {
        let issuer = issuer();
        let client = client();
        let code = issuer
            .issue_code(&client.id, "user-1", "http://cb/")
            .await
            .unwrap();

        let result = authorization_code(&issuer, &client, &code.value, "http://other/").await;
        assert!(matches!(result, Err(AuthError::InvalidCode { .. })));
    }

    #[tokio::test]
    async fn test_code_exchange_is_single_use() {
        let issuer = issuer();
        let client = client();
        let code = issuer
            .issue_code(&client.id, "user-1", "http://cb/")
            .await
            .unwrap();

        authorization_code(&issuer, &client, &code.value, "http://cb/")
            .await
            .unwrap();
        let second = authorization_code(&issuer, &client, &code.value, "http://cb/").await;
        assert!(matches!(second, Err(AuthError::InvalidCode { .. })));
    }

    #[tokio::test]
    async fn test_password_exchange() {
        let issuer = issuer();
        let client = client();
        let users = InMemoryUserStorage::new();
        let hash = crate::password::hash_password("hunter2").unwrap();
        let user = User::new("Ada", "Lovelace", "ada@example.com", hash);
        users.create(&user).await.unwrap();

        let token = password(&issuer, &users, &client, "ada@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(token.user_id.as_deref(), Some(user.id.as_str()));

        let wrong = password(&issuer, &users, &client, "ada@example.com", "wrong").await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials { .. })));

        let unknown = password(&issuer, &users, &client, "nobody@example.com", "hunter2").await;
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials { .. })));
    }

    #[tokio::test]
    async fn test_client_credentials_token_has_no_user() {
        let issuer = issuer();
        let client = client();

        let token = client_credentials(&issuer, &client).await.unwrap();
        assert!(token.is_client_only());
        assert_eq!(token.client_id.as_deref(), Some(client.id.as_str()));
    }
}

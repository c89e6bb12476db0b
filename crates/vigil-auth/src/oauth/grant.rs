//! Grant handlers, one per response type.
//!
//! A grant handler runs once an authorization transaction is approved,
//! whether by explicit consent or automatically for trusted clients and users
//! with a prior live token. It turns the transaction into a redirect
//! back to the client's callback.

use crate::AuthResult;
use crate::oauth::authorize::{self, ResponseType};
use crate::oauth::issuer::TokenIssuer;
use crate::oauth::transaction::Transaction;

/// Runs the grant handler matching the transaction's response type and
/// returns the redirect URL carrying the issued artifact.
///
/// # Errors
///
/// Returns an error if issuance or redirect building fails.
pub async fn issue_grant(issuer: &TokenIssuer, transaction: &Transaction) -> AuthResult<String> {
    match transaction.response_type {
        ResponseType::Code => {
            let code = issuer
                .issue_code(
                    &transaction.client_id,
                    &transaction.user_id,
                    &transaction.redirect_uri,
                )
                .await?;
            authorize::code_redirect_url(&transaction.redirect_uri, &code.value)
        }
        ResponseType::Token => {
            let token = issuer
                .issue_token(Some(&transaction.user_id), Some(&transaction.client_id))
                .await?;
            authorize::token_fragment_url(
                &transaction.redirect_uri,
                &token.value,
                issuer.token_expires_in(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::EnvelopeSigner;
    use crate::storage::memory::{InMemoryCodeStorage, InMemoryTokenStorage};
    use crate::types::{Client, User};
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

    fn transaction(response_type: ResponseType) -> Transaction {
        let client = Client::new("App", "app", "hash", "http://cb/");
        let user = User::new("Ada", "Lovelace", "ada@example.com", "hash");
        Transaction::new(
            &client,
            &user,
            "http://cb/",
            response_type,
            Duration::from_secs(600),
        )
    }

    #[tokio::test]
    async fn test_code_grant_redirects_with_code() {
        let issuer = issuer();
        let txn = transaction(ResponseType::Code);

        let url = issue_grant(&issuer, &txn).await.unwrap();
        assert!(url.starts_with("http://cb/?code="));

        // The issued code is bound to the transaction's values.
        let value = url.split("code=").nth(1).unwrap();
        let code = issuer.resolve_code(value).await.unwrap();
        assert_eq!(code.client_id, txn.client_id);
        assert_eq!(code.user_id, txn.user_id);
        assert_eq!(code.redirect_uri, "http://cb/");
    }

    #[tokio::test]
    async fn test_implicit_grant_redirects_with_fragment() {
        let issuer = issuer();
        let txn = transaction(ResponseType::Token);

        let url = issue_grant(&issuer, &txn).await.unwrap();
        assert!(url.starts_with("http://cb/#access_token="));
        assert!(url.contains("token_type=bearer"));
        assert!(url.contains("expires_in=3600"));
    }
}

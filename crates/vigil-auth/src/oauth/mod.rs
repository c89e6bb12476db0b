//! OAuth 2.0 protocol engine.
//!
//! The engine drives two request families:
//!
//! - the authorization endpoint pair (`/oauth/authorize` and
//!   `/oauth/authorize/decision`), a stateful transaction per
//!   user session, handled by [`OAuthService::authorize`] and
//!   [`OAuthService::decide`];
//! - the token endpoint (`/oauth/token`), stateless per request,
//!   handled by [`OAuthService::exchange`].
//!
//! Grant handlers ([`grant`]) run when an approved transaction turns
//! into a code or implicit token; exchange handlers ([`exchange`]) run
//! at the token endpoint. Both lean on the [`TokenIssuer`] to mint and
//! resolve signed artifacts.

pub mod authorize;
pub mod exchange;
pub mod grant;
pub mod issuer;
pub mod service;
pub mod token;
pub mod transaction;

pub use authorize::{AuthorizationRequest, ResponseType};
pub use issuer::TokenIssuer;
pub use service::{AuthorizeOutcome, OAuthService};
pub use token::{GrantType, OAuthErrorResponse, TokenRequest, TokenResponse};
pub use transaction::Transaction;

//! # vigil-auth
//!
//! OAuth 2.0 authorization server engine for Vigil.
//!
//! This crate provides:
//! - The four OAuth 2.0 grant flows (authorization code, implicit,
//!   resource-owner password, client credentials)
//! - An ordered credential-verification strategy registry
//! - Signed-envelope issuance and validation for codes, access tokens
//!   and login sessions
//! - The server-side authorization transaction (authorize -> consent ->
//!   decision) state machine
//! - Axum HTTP handlers for the OAuth endpoints
//!
//! ## Modules
//!
//! - [`config`] - Engine configuration (lifetimes, signing secret)
//! - [`error`] - Error taxonomy shared across the crate
//! - [`password`] - Salted one-way hashing for secrets and passwords
//! - [`envelope`] - Tamper-evident, time-boxed value encoding
//! - [`types`] - Client, user, code and token records
//! - [`storage`] - Storage traits and the in-memory backend
//! - [`strategy`] - Named verification strategies and ordered chains
//! - [`oauth`] - Protocol engine: transactions, grants, exchanges
//! - [`http`] - Axum HTTP handlers for the OAuth endpoints

pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod oauth;
pub mod password;
pub mod storage;
pub mod strategy;
pub mod types;

pub use config::{AuthConfig, ConfigError};
pub use envelope::{EnvelopeClaims, EnvelopeKind, EnvelopeSigner};
pub use error::{AuthError, ErrorCategory};
pub use oauth::{
    AuthorizationRequest, AuthorizeOutcome, GrantType, OAuthService, ResponseType, TokenIssuer,
    TokenRequest, TokenResponse, Transaction,
};
pub use storage::{
    ClientStorage, CodeStorage, TokenStorage, TransactionStorage, UserStorage,
};
pub use strategy::{AuthStrategy, Credentials, Principal, StrategyChain};
pub use types::{AccessToken, AuthorizationCode, Client, User};

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;

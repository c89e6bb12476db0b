//! Entity records handled by the protocol engine.
//!
//! These records are read and written through the [`crate::storage`]
//! traits. Clients and users are provisioned administratively and are
//! read-only to the engine; codes and tokens are created by it.

mod client;
mod code;
mod token;
mod user;

pub use client::Client;
pub use code::AuthorizationCode;
pub use token::AccessToken;
pub use user::User;

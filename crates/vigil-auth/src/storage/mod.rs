//! Storage traits for protocol entities.
//!
//! The engine treats persistence as an external collaborator behind these
//! traits. Every lookup is a suspension point; implementations must not
//! require the caller to hold any lock across a call. Lookups distinguish
//! "not found" (`Ok(None)`) from storage faults (`Err`).

mod client;
mod code;
pub mod memory;
mod token;
mod transaction;
mod user;

pub use client::ClientStorage;
pub use code::CodeStorage;
pub use token::TokenStorage;
pub use transaction::TransactionStorage;
pub use user::UserStorage;

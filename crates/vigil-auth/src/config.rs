//! Authorization engine configuration.
//!
//! Lifetimes follow the protocol recommendations: authorization codes are
//! short-lived (minutes), access tokens live for days, and login sessions
//! sit in between. All artifact expiry is enforced by the signed envelope
//! at resolution time, so these values are baked into issued values.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum accepted signing secret length in bytes.
const MIN_SECRET_LEN: usize = 32;

/// Configuration for the authorization engine.
///
/// # Example (TOML)
///
/// ```toml
/// [auth]
/// signing_secret = "0123456789abcdef0123456789abcdef"
/// code_lifetime = "10m"
/// token_lifetime = "7d"
/// session_lifetime = "1h"
/// transaction_lifetime = "10m"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Symmetric signing secret for code/token/session envelopes.
    ///
    /// Process-wide, loaded once at startup, never mutated. Must be at
    /// least 32 bytes.
    pub signing_secret: String,

    /// Authorization code lifetime. Default: 10 minutes.
    #[serde(with = "humantime_serde")]
    pub code_lifetime: Duration,

    /// Access token lifetime. Default: 7 days.
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,

    /// Login session envelope lifetime. Default: 1 hour.
    #[serde(with = "humantime_serde")]
    pub session_lifetime: Duration,

    /// In-flight authorization transaction lifetime. Default: 10 minutes.
    #[serde(with = "humantime_serde")]
    pub transaction_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: String::new(),
            code_lifetime: Duration::from_secs(10 * 60),
            token_lifetime: Duration::from_secs(7 * 24 * 60 * 60),
            session_lifetime: Duration::from_secs(60 * 60),
            transaction_lifetime: Duration::from_secs(10 * 60),
        }
    }
}

impl AuthConfig {
    /// Creates a configuration with the given signing secret and default
    /// lifetimes.
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            signing_secret: secret.into(),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing secret is missing or too short, or
    /// if any lifetime is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signing_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSigningSecret {
                min_len: MIN_SECRET_LEN,
            });
        }
        for (name, lifetime) in [
            ("code_lifetime", self.code_lifetime),
            ("token_lifetime", self.token_lifetime),
            ("session_lifetime", self.session_lifetime),
            ("transaction_lifetime", self.transaction_lifetime),
        ] {
            if lifetime.is_zero() {
                return Err(ConfigError::ZeroLifetime { name });
            }
        }
        Ok(())
    }
}

/// Errors produced by configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The signing secret is missing or shorter than the required minimum.
    #[error("signing_secret must be at least {min_len} bytes")]
    WeakSigningSecret {
        /// Required minimum length in bytes.
        min_len: usize,
    },

    /// A lifetime was configured as zero.
    #[error("{name} must be greater than zero")]
    ZeroLifetime {
        /// The offending configuration key.
        name: &'static str,
    },
}

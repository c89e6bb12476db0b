//! Server configuration loading.
//!
//! Configuration is a TOML file found via `--config`, the `VIGIL_CONFIG`
//! environment variable, or `vigil.toml` in the working directory. The
//! signing secret may be supplied (or overridden) through the
//! `VIGIL_SIGNING_SECRET` environment variable so it can stay out of the
//! file.

use std::path::Path;

use serde::Deserialize;
use vigil_auth::AuthConfig;

/// Environment variable overriding the signing secret.
pub const SIGNING_SECRET_ENV: &str = "VIGIL_SIGNING_SECRET";

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub listen: String,

    /// Authorization engine settings.
    pub auth: AuthConfig,

    /// Records created in the in-memory store at startup.
    pub seed: SeedConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8080".to_string(),
            auth: AuthConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

/// Seed data for the in-memory backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Registered OAuth clients.
    pub clients: Vec<SeedClient>,

    /// User accounts.
    pub users: Vec<SeedUser>,
}

/// A client registration from the configuration file.
///
/// The secret is given in plaintext here and hashed at startup; only the
/// hash is held in memory afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedClient {
    /// Display name shown on the consent page.
    pub name: String,
    /// Public client identifier.
    pub client_id: String,
    /// Plaintext client secret.
    pub client_secret: String,
    /// The single registered redirect URI, matched byte-for-byte.
    pub redirect_uri: String,
    /// Trusted clients skip the consent prompt.
    #[serde(default)]
    pub trusted: bool,
}

/// A user account from the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login email, unique.
    pub email: String,
    /// Plaintext password, hashed at startup.
    pub password: String,
    /// Administrators pass the admin-gated bearer strategy.
    #[serde(default)]
    pub admin: bool,
}

/// Errors produced while loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The path that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// The path that failed.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The configuration is syntactically valid but unusable.
    #[error(transparent)]
    Invalid(#[from] vigil_auth::ConfigError),
}

/// Loads, overrides, and validates the server configuration.
///
/// A missing file at the default path yields the default configuration;
/// an explicitly requested path must exist. `VIGIL_SIGNING_SECRET` takes
/// precedence over the file's `auth.signing_secret`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// resulting configuration fails validation.
pub fn load_config(path: &str, explicit: bool) -> Result<ServerConfig, ConfigLoadError> {
    let mut config = if Path::new(path).exists() {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigLoadError::Parse {
            path: path.to_string(),
            source,
        })?
    } else if explicit {
        return Err(ConfigLoadError::Read {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    } else {
        ServerConfig::default()
    };

    if let Ok(secret) = std::env::var(SIGNING_SECRET_ENV) {
        config.auth.signing_secret = secret;
    }

    config.auth.validate()?;
    Ok(config)
}

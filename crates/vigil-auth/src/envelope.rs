//! Signed envelope encoding for opaque code/token/session values.
//!
//! Codes, access tokens and login sessions are handed to callers as
//! opaque-looking strings that are internally a signed, time-boxed
//! encoding. The signature and expiry check happen before any storage
//! lookup, so a forged or stale value never reaches the repository.
//!
//! The envelope is a JWT signed with a process-wide symmetric secret.
//! The algorithm is an implementation detail of this module; callers
//! only see [`EnvelopeSigner::issue`] and [`EnvelopeSigner::resolve`].

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation, decode, encode, errors};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::AuthResult;
use crate::error::AuthError;

/// What an envelope stands for.
///
/// The kind is embedded in the signed payload so a value issued for one
/// purpose can never be replayed for another (a login session is not an
/// access token).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    /// Authorization code.
    Code,
    /// Access (bearer) token.
    Token,
    /// Short-lived login session.
    Session,
}

impl EnvelopeKind {
    /// Returns the string representation of the envelope kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Token => "token",
            Self::Session => "session",
        }
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signed payload carried inside an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeClaims {
    /// Unique envelope identifier.
    pub jti: String,

    /// Subject the envelope was issued for (user id, client id, or empty
    /// for codes whose binding lives in the stored record).
    pub sub: String,

    /// Envelope kind.
    pub kind: EnvelopeKind,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Issues and verifies signed envelopes with a symmetric secret.
pub struct EnvelopeSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl EnvelopeSigner {
    /// Creates a signer from the process-wide signing secret.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry windows are part of the protocol contract; no clock slack.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a fresh envelope of the given kind, bound to `sub` and valid
    /// for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns an `Internal` error if signing fails.
    pub fn issue(&self, kind: EnvelopeKind, sub: &str, ttl: Duration) -> AuthResult<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = EnvelopeClaims {
            jti: Uuid::new_v4().to_string(),
            sub: sub.to_string(),
            kind,
            iat: now,
            exp: now + i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        };
        encode(&jsonwebtoken::Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("envelope signing failed: {e}")))
    }

    /// Verifies an envelope's signature and expiry and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` if the value is malformed, the signature does
    /// not verify, the envelope has expired, or the kind does not match
    /// `expected_kind`.
    pub fn resolve(&self, value: &str, expected_kind: EnvelopeKind) -> AuthResult<EnvelopeClaims> {
        let data = decode::<EnvelopeClaims>(value, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                errors::ErrorKind::ExpiredSignature => {
                    AuthError::invalid_token("envelope expired")
                }
                _ => AuthError::invalid_token("envelope malformed or signature invalid"),
            },
        )?;

        if data.claims.kind != expected_kind {
            return Err(AuthError::invalid_token(format!(
                "expected {expected_kind} envelope, got {}",
                data.claims.kind
            )));
        }

        Ok(data.claims)
    }
}

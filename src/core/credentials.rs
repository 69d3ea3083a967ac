//! API key resolution.
//!
//! The key is looked up once at startup, first in the system keyring and then
//! in the `GROQ_API_KEY` environment variable. A missing key is fatal.

use std::fmt;

use thiserror::Error;
use tracing::debug;

pub const KEYRING_SERVICE: &str = "stephen-wolf";
pub const KEYRING_USER: &str = "groq";
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Groq API key missing. Run `stephen-wolf auth` or set GROQ_API_KEY.")]
    Missing,
    #[error("API key cannot be empty")]
    Empty,
    #[error("System keyring unavailable: {0}")]
    Keyring(#[from] keyring::Error),
}

/// A resolved API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, CredentialError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Resolve the key from the keyring, then the environment.
pub fn resolve_api_key() -> Result<ApiKey, CredentialError> {
    choose_api_key(read_keyring(), std::env::var(API_KEY_ENV).ok())
}

/// Pick the first non-blank candidate: stored key before environment.
pub fn choose_api_key(
    stored: Option<String>,
    environment: Option<String>,
) -> Result<ApiKey, CredentialError> {
    [stored, environment]
        .into_iter()
        .flatten()
        .find_map(|candidate| ApiKey::new(candidate).ok())
        .ok_or(CredentialError::Missing)
}

fn keyring_entry() -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)
}

fn read_keyring() -> Option<String> {
    match keyring_entry().and_then(|entry| entry.get_password()) {
        Ok(key) => Some(key),
        Err(keyring::Error::NoEntry) => None,
        Err(err) => {
            debug!(error = %err, "keyring lookup failed; falling back to environment");
            None
        }
    }
}

pub fn store_api_key(key: &ApiKey) -> Result<(), CredentialError> {
    keyring_entry()?.set_password(key.expose())?;
    Ok(())
}

/// Remove the stored key. Returns `false` when nothing was stored.
pub fn remove_api_key() -> Result<bool, CredentialError> {
    match keyring_entry()?.delete_credential() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(err) => Err(err.into()),
    }
}

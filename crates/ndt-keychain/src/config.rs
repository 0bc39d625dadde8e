//! # Key Chain Configuration
//!
//! Backend selection happens through `scheme:location` locators. Resolution
//! precedence for each backend: explicit config field, then the process
//! environment (read once), then the platform default.

use crate::domain::errors::ConfigError;
use std::sync::OnceLock;

/// Default catalog locator.
pub const DEFAULT_PIB_LOCATOR: &str = "pib-memory:";

/// Default key store locator.
pub const DEFAULT_TPM_LOCATOR: &str = "tpm-memory:";

/// Environment variable overriding the catalog locator.
pub const PIB_ENV_VAR: &str = "NDT_CLIENT_PIB";

/// Environment variable overriding the key store locator.
pub const TPM_ENV_VAR: &str = "NDT_CLIENT_TPM";

static PIB_ENV: OnceLock<Option<String>> = OnceLock::new();
static TPM_ENV: OnceLock<Option<String>> = OnceLock::new();

/// A parsed `scheme:location` backend locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Backend scheme (registry lookup key).
    pub scheme: String,
    /// Backend-specific location; may be empty.
    pub location: String,
}

impl Locator {
    /// Parse `scheme:location`. The scheme must be non-empty; the location
    /// may be empty (`pib-memory:`).
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let (scheme, location) = text
            .split_once(':')
            .ok_or_else(|| ConfigError::MalformedLocator(text.to_string()))?;
        if scheme.is_empty() {
            return Err(ConfigError::MalformedLocator(text.to_string()));
        }
        Ok(Self {
            scheme: scheme.to_string(),
            location: location.to_string(),
        })
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.scheme, self.location)
    }
}

/// Configuration for [`crate::KeyChain`] construction.
#[derive(Debug, Clone, Default)]
pub struct KeyChainConfig {
    /// Catalog locator; `None` falls through to environment, then default.
    pub pib_locator: Option<String>,
    /// Key store locator; `None` falls through to environment, then default.
    pub tpm_locator: Option<String>,
    /// Wipe the catalog instead of failing when it is paired with a
    /// different key store locator than the one requested.
    pub allow_reset: bool,
}

impl KeyChainConfig {
    /// In-memory backends, no environment involvement. The standard test
    /// configuration.
    pub fn for_testing() -> Self {
        Self {
            pib_locator: Some(DEFAULT_PIB_LOCATOR.to_string()),
            tpm_locator: Some(DEFAULT_TPM_LOCATOR.to_string()),
            allow_reset: false,
        }
    }

    /// Resolve the effective catalog locator.
    pub fn resolve_pib_locator(&self) -> Result<Locator, ConfigError> {
        resolve(self.pib_locator.as_deref(), &PIB_ENV, PIB_ENV_VAR, DEFAULT_PIB_LOCATOR)
    }

    /// Resolve the effective key store locator.
    pub fn resolve_tpm_locator(&self) -> Result<Locator, ConfigError> {
        resolve(self.tpm_locator.as_deref(), &TPM_ENV, TPM_ENV_VAR, DEFAULT_TPM_LOCATOR)
    }
}

// The environment is sampled once per process; later mutations of the
// variables do not change which backends a key chain selects.
fn resolve(
    explicit: Option<&str>,
    cache: &OnceLock<Option<String>>,
    var: &str,
    default: &str,
) -> Result<Locator, ConfigError> {
    if let Some(text) = explicit {
        return Locator::parse(text);
    }
    let from_env = cache.get_or_init(|| std::env::var(var).ok());
    match from_env {
        Some(text) => Locator::parse(text),
        None => Locator::parse(default),
    }
}

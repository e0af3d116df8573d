//! Protocol core configuration.
//!
//! [`CoreConfig`] is loaded once (typically from TOML) and shared through a
//! [`ConfigHandle`]. Every request takes a single [`ConfigHandle::snapshot`]
//! and works against it; a reload swaps the whole snapshot atomically and
//! never touches the one a request is already using.
//!
//! # Example (TOML)
//!
//! ```toml
//! issuer = "https://auth.example.com"
//! code_challenge_methods = ["S256"]
//!
//! [input_length_restrictions]
//! state = 512
//! scope = 1000
//! ```

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pkce::CodeChallengeMethod;
use crate::types::ResponseMode;

/// Root configuration of the protocol core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Issuer identifier, returned as `iss` in token responses.
    pub issuer: String,

    /// Maximum (and for PKCE values, minimum) lengths of request parameters.
    pub input_length_restrictions: InputLengthRestrictions,

    /// PKCE methods accepted at the authorize endpoint.
    pub code_challenge_methods: Vec<CodeChallengeMethod>,

    /// Response modes accepted at the authorize endpoint.
    pub response_modes: Vec<ResponseMode>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            issuer: "https://localhost".to_string(),
            input_length_restrictions: InputLengthRestrictions::default(),
            code_challenge_methods: vec![CodeChallengeMethod::S256, CodeChallengeMethod::Plain],
            response_modes: vec![
                ResponseMode::Query,
                ResponseMode::Fragment,
                ResponseMode::FormPost,
            ],
        }
    }
}

/// Parameter length limits.
///
/// Every limit is measured in bytes of the raw parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputLengthRestrictions {
    pub client_id: usize,
    pub response_type: usize,
    pub response_mode: usize,
    pub state: usize,
    pub redirect_uri: usize,
    /// Whole `scope` parameter.
    pub scope: usize,
    /// Single space-delimited entry of the `scope` parameter.
    pub scope_entry: usize,
    pub nonce: usize,
    pub code: usize,
    pub refresh_token: usize,
    pub grant_type: usize,
    pub code_challenge_method: usize,
    pub code_challenge_min_length: usize,
    pub code_challenge_max_length: usize,
    pub code_verifier_min_length: usize,
    pub code_verifier_max_length: usize,
}

impl Default for InputLengthRestrictions {
    fn default() -> Self {
        Self {
            client_id: 100,
            response_type: 100,
            response_mode: 100,
            state: 300,
            redirect_uri: 2048,
            scope: 2000,
            scope_entry: 200,
            nonce: 300,
            code: 128,
            refresh_token: 128,
            grant_type: 100,
            code_challenge_method: 100,
            code_challenge_min_length: 43,
            code_challenge_max_length: 128,
            code_verifier_min_length: 43,
            code_verifier_max_length: 128,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// The configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl CoreConfig {
    /// Parses a TOML document and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range or inconsistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.is_empty() {
            return Err(ConfigError::InvalidValue(
                "issuer cannot be empty".to_string(),
            ));
        }
        match url::Url::parse(&self.issuer) {
            Ok(url) if url.query().is_none() && url.fragment().is_none() => {}
            _ => {
                return Err(ConfigError::InvalidValue(format!(
                    "issuer must be an absolute URL without query or fragment, got '{}'",
                    self.issuer
                )));
            }
        }

        if self.code_challenge_methods.is_empty() {
            return Err(ConfigError::InvalidValue(
                "code_challenge_methods cannot be empty".to_string(),
            ));
        }
        if self.response_modes.is_empty() {
            return Err(ConfigError::InvalidValue(
                "response_modes cannot be empty".to_string(),
            ));
        }

        self.input_length_restrictions.validate()
    }
}

impl InputLengthRestrictions {
    fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("client_id", self.client_id),
            ("response_type", self.response_type),
            ("response_mode", self.response_mode),
            ("state", self.state),
            ("redirect_uri", self.redirect_uri),
            ("scope", self.scope),
            ("scope_entry", self.scope_entry),
            ("nonce", self.nonce),
            ("code", self.code),
            ("refresh_token", self.refresh_token),
            ("grant_type", self.grant_type),
            ("code_challenge_method", self.code_challenge_method),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::InvalidValue(format!(
                    "input length limit '{name}' must be > 0"
                )));
            }
        }

        if self.scope_entry > self.scope {
            return Err(ConfigError::InvalidValue(
                "scope_entry cannot exceed scope".to_string(),
            ));
        }
        if self.code_challenge_min_length == 0
            || self.code_challenge_min_length > self.code_challenge_max_length
        {
            return Err(ConfigError::InvalidValue(
                "code_challenge length range is empty".to_string(),
            ));
        }
        if self.code_verifier_min_length == 0
            || self.code_verifier_min_length > self.code_verifier_max_length
        {
            return Err(ConfigError::InvalidValue(
                "code_verifier length range is empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Shared Snapshot Handle
// =============================================================================

/// Shared, atomically replaceable configuration.
///
/// Cloning the handle is cheap; all clones observe the same snapshot.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    inner: Arc<ArcSwap<CoreConfig>>,
}

impl ConfigHandle {
    /// Wraps a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: CoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(ArcSwap::from_pointee(config)),
        })
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CoreConfig> {
        self.inner.load_full()
    }

    /// Replaces the snapshot after validating the new configuration.
    ///
    /// Requests already holding the previous snapshot keep using it.
    ///
    /// # Errors
    ///
    /// Returns an error if the new configuration fails validation; the
    /// current snapshot stays in place.
    pub fn replace(&self, config: CoreConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.inner.store(Arc::new(config));
        info!("Protocol core configuration reloaded");
        Ok(())
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(CoreConfig::default())),
        }
    }
}

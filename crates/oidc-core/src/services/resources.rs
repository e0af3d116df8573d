//! Scope and resource resolution.
//!
//! [`ResourceService`] turns a set of requested scopes into
//! [`ValidResources`] for a client. [`ScopeCatalog`] is the default
//! implementation, backed by a static list of scope definitions.
//!
//! Two kinds of failure are kept apart: a request asking for something the
//! client may not have ([`ResourceValidationError::InvalidScope`]) and a
//! deployment whose client and scope definitions disagree
//! ([`ResourceValidationError::Configuration`]).

use async_trait::async_trait;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{CoreError, ensure_not_cancelled};
use crate::types::{Client, OFFLINE_ACCESS, OPENID, TokenTypeFilter, ValidResources};

/// Scope resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum ResourceValidationError {
    /// The request asked for a scope the client cannot have.
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// Client and scope definitions are inconsistent.
    #[error("Scope configuration error: {0}")]
    Configuration(String),

    /// The lookup itself failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Resolves requested scopes against client and server policy.
#[async_trait]
pub trait ResourceService: Send + Sync {
    /// Validate `requested` scopes for `client`.
    ///
    /// # Errors
    ///
    /// See [`ResourceValidationError`].
    async fn validate_requested_scopes(
        &self,
        client: &Client,
        requested: &IndexSet<String>,
        filter: TokenTypeFilter,
        cancel: &CancellationToken,
    ) -> Result<ValidResources, ResourceValidationError>;

    /// Scopes used when a request carries no `scope` parameter.
    ///
    /// The client's configured default scopes when there are any. Otherwise
    /// every scope the client may request, minus `openid` unless `filter`
    /// admits ID token scopes.
    ///
    /// # Errors
    ///
    /// See [`ResourceValidationError`].
    async fn default_scopes(
        &self,
        client: &Client,
        filter: TokenTypeFilter,
        cancel: &CancellationToken,
    ) -> Result<IndexSet<String>, ResourceValidationError> {
        ensure_not_cancelled(cancel)?;

        if !client.default_scopes.is_empty() {
            return Ok(client.default_scopes.iter().cloned().collect());
        }
        Ok(client
            .scopes
            .iter()
            .filter(|scope| filter == TokenTypeFilter::IdTokenAndAccessToken || scope.as_str() != OPENID)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Static Scope Catalog
// =============================================================================

/// Token type a scope contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeTokenType {
    IdToken,
    AccessToken,
}

/// A scope known to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDefinition {
    pub name: String,
    pub token_types: Vec<ScopeTokenType>,
}

impl ScopeDefinition {
    /// Creates a scope definition.
    #[must_use]
    pub fn new(name: impl Into<String>, token_types: impl IntoIterator<Item = ScopeTokenType>) -> Self {
        Self {
            name: name.into(),
            token_types: token_types.into_iter().collect(),
        }
    }

    fn matches(&self, filter: TokenTypeFilter) -> bool {
        match filter {
            TokenTypeFilter::AccessToken => self.token_types.contains(&ScopeTokenType::AccessToken),
            TokenTypeFilter::IdTokenAndAccessToken => !self.token_types.is_empty(),
        }
    }
}

/// [`ResourceService`] over a fixed set of scope definitions.
#[derive(Debug, Clone, Default)]
pub struct ScopeCatalog {
    scopes: IndexMap<String, ScopeDefinition>,
}

impl ScopeCatalog {
    /// Creates a catalog from scope definitions.
    #[must_use]
    pub fn new(definitions: impl IntoIterator<Item = ScopeDefinition>) -> Self {
        Self {
            scopes: definitions
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        }
    }

    /// Creates a catalog with the standard OpenID Connect scopes.
    #[must_use]
    pub fn with_standard_scopes() -> Self {
        Self::new([
            ScopeDefinition::new(OPENID, [ScopeTokenType::IdToken]),
            ScopeDefinition::new("profile", [ScopeTokenType::IdToken]),
            ScopeDefinition::new("email", [ScopeTokenType::IdToken]),
            ScopeDefinition::new(OFFLINE_ACCESS, [ScopeTokenType::AccessToken]),
        ])
    }

    /// Adds or replaces a definition.
    #[must_use]
    pub fn with_scope(mut self, definition: ScopeDefinition) -> Self {
        self.scopes.insert(definition.name.clone(), definition);
        self
    }
}

#[async_trait]
impl ResourceService for ScopeCatalog {
    async fn validate_requested_scopes(
        &self,
        client: &Client,
        requested: &IndexSet<String>,
        filter: TokenTypeFilter,
        cancel: &CancellationToken,
    ) -> Result<ValidResources, ResourceValidationError> {
        ensure_not_cancelled(cancel)?;

        for scope in requested {
            if !client.is_scope_allowed(scope) {
                return Err(ResourceValidationError::InvalidScope(format!(
                    "Scope '{scope}' is not allowed for this client"
                )));
            }
            let Some(definition) = self.scopes.get(scope) else {
                return Err(ResourceValidationError::Configuration(format!(
                    "Client '{}' allows scope '{scope}' which is not defined",
                    client.client_id
                )));
            };
            if !definition.matches(filter) {
                return Err(ResourceValidationError::InvalidScope(format!(
                    "Scope '{scope}' cannot be requested here"
                )));
            }
        }

        Ok(ValidResources::new(requested.clone()))
    }

    async fn default_scopes(
        &self,
        client: &Client,
        filter: TokenTypeFilter,
        cancel: &CancellationToken,
    ) -> Result<IndexSet<String>, ResourceValidationError> {
        ensure_not_cancelled(cancel)?;

        if !client.default_scopes.is_empty() {
            return Ok(client.default_scopes.iter().cloned().collect());
        }
        // Undefined scopes stay in so resolution reports the misconfiguration.
        Ok(client
            .scopes
            .iter()
            .filter(|scope| self.scopes.get(*scope).is_none_or(|d| d.matches(filter)))
            .cloned()
            .collect())
    }
}

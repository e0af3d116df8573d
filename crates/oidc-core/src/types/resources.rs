//! Resolved resources and resource-owner profiles.

use indexmap::IndexSet;
use serde_json::{Map, Value};

/// `openid` scope value.
pub const OPENID: &str = "openid";

/// `offline_access` scope value.
pub const OFFLINE_ACCESS: &str = "offline_access";

/// Token types a scope resolution is performed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenTypeFilter {
    /// Only scopes that end up in access tokens.
    AccessToken,
    /// Scopes for both ID tokens and access tokens (OpenID requests).
    IdTokenAndAccessToken,
}

impl TokenTypeFilter {
    /// Filter for a request that does or does not include `openid`.
    #[must_use]
    pub fn for_openid(is_openid: bool) -> Self {
        if is_openid {
            Self::IdTokenAndAccessToken
        } else {
            Self::AccessToken
        }
    }
}

/// Scope grant resolved for a single request.
///
/// Derived on every request and never persisted by the core.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidResources {
    raw_scopes: IndexSet<String>,
    has_openid: bool,
    has_offline_access: bool,
}

impl ValidResources {
    /// Creates resources from the resolved scope set.
    #[must_use]
    pub fn new(raw_scopes: IndexSet<String>) -> Self {
        let has_openid = raw_scopes.contains(OPENID);
        let has_offline_access = raw_scopes.contains(OFFLINE_ACCESS);
        Self {
            raw_scopes,
            has_openid,
            has_offline_access,
        }
    }

    /// Returns the granted scopes in request order.
    #[must_use]
    pub fn raw_scopes(&self) -> &IndexSet<String> {
        &self.raw_scopes
    }

    /// Returns `true` if `openid` was granted.
    #[must_use]
    pub fn has_openid(&self) -> bool {
        self.has_openid
    }

    /// Returns `true` if `offline_access` was granted.
    #[must_use]
    pub fn has_offline_access(&self) -> bool {
        self.has_offline_access
    }

    /// Returns the scopes joined with spaces, or `None` if there are none.
    #[must_use]
    pub fn scope_string(&self) -> Option<String> {
        if self.raw_scopes.is_empty() {
            return None;
        }
        Some(
            self.raw_scopes
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// Resource-owner profile used when issuing tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceOwnerProfile {
    /// Subject identifier (`sub`).
    pub subject_id: String,
    /// Claims released for the granted resources.
    pub claims: Map<String, Value>,
}

impl ResourceOwnerProfile {
    /// Creates a profile without additional claims.
    #[must_use]
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            claims: Map::new(),
        }
    }
}

/// Outcome of a profile lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileResult {
    /// `false` if the account has been disabled.
    pub is_active: bool,
    pub profile: ResourceOwnerProfile,
}

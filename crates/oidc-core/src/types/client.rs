//! OAuth 2.1 client registration types.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::protocol::ResponseTypeToken;
use crate::syntax;

// =============================================================================
// Grant Type
// =============================================================================

/// OAuth 2.1 grant types a client can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    /// Authorization Code flow.
    AuthorizationCode,
    /// Implicit issuance of an ID token from the authorize endpoint.
    Implicit,
    /// Client Credentials flow.
    ClientCredentials,
    /// Refresh Token flow.
    RefreshToken,
}

impl GrantType {
    /// Returns the OAuth `grant_type` parameter value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationCode => "authorization_code",
            Self::Implicit => "implicit",
            Self::ClientCredentials => "client_credentials",
            Self::RefreshToken => "refresh_token",
        }
    }

    /// Parses a grant type accepted at the token endpoint.
    ///
    /// `implicit` never reaches the token endpoint and is rejected here.
    #[must_use]
    pub fn parse_token_grant(value: &str) -> Option<Self> {
        match value {
            "authorization_code" => Some(Self::AuthorizationCode),
            "client_credentials" => Some(Self::ClientCredentials),
            "refresh_token" => Some(Self::RefreshToken),
            _ => None,
        }
    }
}

impl std::fmt::Display for GrantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Client
// =============================================================================

/// Registered OAuth client.
///
/// Owned by the client store and immutable for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique client identifier (VSCHAR).
    pub client_id: String,

    /// Human-readable display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Moment the client secret stops being accepted, if it expires.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub client_secret_expires_at: Option<OffsetDateTime>,

    /// Allowed grant types. Empty means `authorization_code` only.
    #[serde(default)]
    pub grant_types: Vec<GrantType>,

    /// Allowed response types. Empty means `code` only.
    #[serde(default)]
    pub response_types: Vec<ResponseTypeToken>,

    /// Registered redirect URIs.
    #[serde(default)]
    pub redirect_uris: Vec<String>,

    /// Scopes the client may request.
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Scopes used when an OAuth request omits `scope`.
    #[serde(default)]
    pub default_scopes: Vec<String>,
}

impl Client {
    /// Creates a client with default capabilities.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            name: None,
            client_secret_expires_at: None,
            grant_types: Vec::new(),
            response_types: Vec::new(),
            redirect_uris: Vec::new(),
            scopes: Vec::new(),
            default_scopes: Vec::new(),
        }
    }

    /// Sets the allowed grant types.
    #[must_use]
    pub fn with_grant_types(mut self, grant_types: impl IntoIterator<Item = GrantType>) -> Self {
        self.grant_types = grant_types.into_iter().collect();
        self
    }

    /// Sets the allowed response types.
    #[must_use]
    pub fn with_response_types(
        mut self,
        response_types: impl IntoIterator<Item = ResponseTypeToken>,
    ) -> Self {
        self.response_types = response_types.into_iter().collect();
        self
    }

    /// Sets the registered redirect URIs.
    #[must_use]
    pub fn with_redirect_uris<S: Into<String>>(mut self, uris: impl IntoIterator<Item = S>) -> Self {
        self.redirect_uris = uris.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the scopes the client may request.
    #[must_use]
    pub fn with_scopes<S: Into<String>>(mut self, scopes: impl IntoIterator<Item = S>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the scopes used when `scope` is omitted.
    #[must_use]
    pub fn with_default_scopes<S: Into<String>>(
        mut self,
        scopes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.default_scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if the client may use the given grant type.
    #[must_use]
    pub fn is_grant_type_allowed(&self, grant_type: GrantType) -> bool {
        if self.grant_types.is_empty() {
            return grant_type == GrantType::AuthorizationCode;
        }
        self.grant_types.contains(&grant_type)
    }

    /// Returns `true` if the client registered the given response type.
    #[must_use]
    pub fn is_response_type_allowed(&self, response_type: ResponseTypeToken) -> bool {
        if self.response_types.is_empty() {
            return response_type == ResponseTypeToken::Code;
        }
        self.response_types.contains(&response_type)
    }

    /// Returns `true` if the client may request the scope.
    #[must_use]
    pub fn is_scope_allowed(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// Returns `true` if the client secret has expired at `now`.
    #[must_use]
    pub fn is_secret_expired(&self, now: OffsetDateTime) -> bool {
        self.client_secret_expires_at
            .is_some_and(|expires_at| expires_at <= now)
    }

    /// Validates the registration.
    ///
    /// Checked whenever a client enters a pipeline; a stored client that
    /// fails here is a server fault, not a client error.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.client_id.is_empty() || !syntax::is_vschar(&self.client_id) {
            return Err(ClientValidationError::InvalidClientId);
        }

        for uri in &self.redirect_uris {
            if syntax::parse_redirect_uri(uri).is_none() {
                return Err(ClientValidationError::InvalidRedirectUri(uri.clone()));
            }
        }

        for scope in self.scopes.iter().chain(&self.default_scopes) {
            if !syntax::is_scope_token(scope) {
                return Err(ClientValidationError::InvalidScope(scope.clone()));
            }
        }
        if let Some(scope) = self.default_scopes.iter().find(|s| !self.is_scope_allowed(s)) {
            return Err(ClientValidationError::InvalidScope(scope.clone()));
        }

        Ok(())
    }
}

/// Client registration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientValidationError {
    /// The client identifier is empty or not VSCHAR.
    #[error("client_id must be a non-empty VSCHAR string")]
    InvalidClientId,

    /// A redirect URI is not absolute or has a fragment.
    #[error("Invalid redirect URI: {0}")]
    InvalidRedirectUri(String),

    /// A scope is malformed or a default scope is not allowed.
    #[error("Invalid scope: {0}")]
    InvalidScope(String),
}

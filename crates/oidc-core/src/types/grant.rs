//! Grant artifacts and consent records.
//!
//! Authorization codes and refresh tokens are created by issuance
//! collaborators and persisted by the stores; the core only reads them.
//! One-time use is enforced by the stores' consume operations.

use indexmap::IndexSet;
use time::OffsetDateTime;

use crate::pkce::CodeChallengeMethod;

/// Identifiers of an authenticated resource owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceOwnerIdentifiers {
    /// Subject identifier (`sub`).
    pub subject_id: String,
    /// Session the authentication belongs to (`sid`).
    pub session_id: Option<String>,
}

/// Claims captured at authentication time and carried by grant artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssentialClaims {
    pub identifiers: ResourceOwnerIdentifiers,
    /// Time the resource owner authenticated (`auth_time`).
    pub auth_time: OffsetDateTime,
}

impl EssentialClaims {
    /// Creates essential claims for a subject.
    #[must_use]
    pub fn new(subject_id: impl Into<String>, auth_time: OffsetDateTime) -> Self {
        Self {
            identifiers: ResourceOwnerIdentifiers {
                subject_id: subject_id.into(),
                session_id: None,
            },
            auth_time,
        }
    }

    /// Returns the subject identifier.
    #[must_use]
    pub fn subject_id(&self) -> &str {
        &self.identifiers.subject_id
    }
}

/// Stored authorization code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCode {
    /// Client the code was issued to.
    pub client_id: String,
    pub essential_claims: EssentialClaims,
    /// Scopes granted at the authorize endpoint.
    pub granted_scopes: IndexSet<String>,
    pub code_challenge: String,
    pub code_challenge_method: CodeChallengeMethod,
    /// Redirect URI the authorize response was sent to.
    pub redirect_uri: Option<String>,
    /// `nonce` of the authorize request, echoed into the ID token.
    pub nonce: Option<String>,
    pub issued_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// Stored refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    /// Client the token was issued to.
    pub client_id: String,
    pub essential_claims: EssentialClaims,
    /// Scopes the token may be exchanged for.
    pub granted_scopes: IndexSet<String>,
    /// Handle of the access token issued together with this refresh token.
    pub reference_access_token_handle: Option<String>,
    pub issued_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// Scopes a resource owner has approved for a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantedConsent {
    pub subject_id: String,
    pub client_id: String,
    pub granted_scopes: IndexSet<String>,
}

impl GrantedConsent {
    /// Returns `true` if every scope in `scopes` has been approved.
    #[must_use]
    pub fn covers(&self, scopes: &IndexSet<String>) -> bool {
        scopes.is_subset(&self.granted_scopes)
    }
}

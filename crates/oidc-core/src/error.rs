//! Protocol and core error types.
//!
//! Two classes of failure flow through the validation pipelines:
//!
//! - [`ProtocolError`] - the wire-level `{error, error_description}` pair that
//!   is communicated to the client, either rendered directly or delivered via
//!   the redirect URI.
//! - [`CoreError`] - everything a pipeline can return, wrapping protocol
//!   errors together with fatal outcomes (cancellation, broken preconditions,
//!   misconfiguration, collaborator failures). Fatal outcomes always surface
//!   to clients as `server_error`.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::types::ClientValidationError;

// =============================================================================
// Error Codes
// =============================================================================

/// OAuth 2.1 / OpenID Connect error codes used by the authorize and token
/// endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is missing a parameter, repeats one, or is malformed.
    InvalidRequest,
    /// Client authentication failed.
    InvalidClient,
    /// The grant (code or refresh token) is invalid, expired or revoked.
    InvalidGrant,
    /// The client is not allowed to use this flow.
    UnauthorizedClient,
    /// The grant type is not supported by the server.
    UnsupportedGrantType,
    /// The response type is not supported for this client.
    UnsupportedResponseType,
    /// The requested scope is invalid or unknown.
    InvalidScope,
    /// The resource owner denied the request.
    AccessDenied,
    /// The server encountered an unexpected condition.
    ServerError,
    /// The server is temporarily unable to handle the request.
    TemporarilyUnavailable,
}

impl ErrorCode {
    /// Returns the wire value of the error code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::InvalidScope => "invalid_scope",
            Self::AccessDenied => "access_denied",
            Self::ServerError => "server_error",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
        }
    }

    /// Returns the HTTP status code used when the error is rendered directly.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidClient => 401,
            Self::ServerError => 500,
            Self::TemporarilyUnavailable => 503,
            _ => 400,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Protocol Error
// =============================================================================

/// Wire-level OAuth error pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolError {
    /// Error code.
    pub error: ErrorCode,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl ProtocolError {
    /// Creates a protocol error with a description.
    #[must_use]
    pub fn new(error: ErrorCode, description: impl Into<String>) -> Self {
        Self {
            error,
            error_description: Some(description.into()),
        }
    }

    /// Creates a protocol error without a description.
    #[must_use]
    pub fn bare(error: ErrorCode) -> Self {
        Self {
            error,
            error_description: None,
        }
    }

    /// Creates an `invalid_request` error.
    #[must_use]
    pub fn invalid_request(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, description)
    }

    /// Creates an `invalid_grant` error.
    #[must_use]
    pub fn invalid_grant(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidGrant, description)
    }

    /// Creates an `unauthorized_client` error.
    #[must_use]
    pub fn unauthorized_client(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnauthorizedClient, description)
    }

    /// Creates an `unsupported_grant_type` error.
    #[must_use]
    pub fn unsupported_grant_type(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedGrantType, description)
    }

    /// Creates an `unsupported_response_type` error.
    #[must_use]
    pub fn unsupported_response_type(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedResponseType, description)
    }

    /// Creates an `invalid_scope` error.
    #[must_use]
    pub fn invalid_scope(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidScope, description)
    }

    /// Creates a `server_error` error.
    #[must_use]
    pub fn server_error(description: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServerError, description)
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {}", self.error, description),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for ProtocolError {}

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the validation pipelines and the response generator.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A client-facing protocol error.
    #[error("Protocol error: {0}")]
    Protocol(ProtocolError),

    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// An internal precondition was violated.
    #[error("Precondition failed: {message}")]
    Precondition {
        /// Description of the violated precondition.
        message: String,
    },

    /// The server or a collaborator is misconfigured.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// A store or another collaborator failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// Token issuance failed.
    #[error("Token issuance error: {message}")]
    Issuance {
        /// Description of the issuance failure.
        message: String,
    },
}

impl CoreError {
    /// Creates a new `Precondition` error.
    #[must_use]
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Issuance` error.
    #[must_use]
    pub fn issuance(message: impl Into<String>) -> Self {
        Self::Issuance {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is meant to be shown to the client as is.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// Returns `true` if the operation was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the category for logging.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Protocol(_) => ErrorCategory::Protocol,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Precondition { .. } | Self::Issuance { .. } => ErrorCategory::Internal,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Storage { .. } => ErrorCategory::Storage,
        }
    }

    /// Returns the OAuth error code for this error.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::Protocol(error) => error.error.as_str(),
            _ => ErrorCode::ServerError.as_str(),
        }
    }

    /// Converts the error into the pair that may be shown to the client.
    ///
    /// Internal messages are never exposed; fatal errors become a bare
    /// `server_error`.
    #[must_use]
    pub fn to_protocol_error(&self) -> ProtocolError {
        match self {
            Self::Protocol(error) => error.clone(),
            Self::Configuration { .. } => ProtocolError::server_error("Misconfigured"),
            _ => ProtocolError::bare(ErrorCode::ServerError),
        }
    }
}

impl From<ProtocolError> for CoreError {
    fn from(error: ProtocolError) -> Self {
        Self::Protocol(error)
    }
}

impl From<ClientValidationError> for CoreError {
    fn from(error: ClientValidationError) -> Self {
        Self::precondition(format!("Invalid client registration: {error}"))
    }
}

/// Error categories for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Client-facing protocol errors.
    Protocol,
    /// Caller cancelled the operation.
    Cancelled,
    /// Server or collaborator misconfiguration.
    Configuration,
    /// Storage or collaborator failures.
    Storage,
    /// Internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol => write!(f, "protocol"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Configuration => write!(f, "configuration"),
            Self::Storage => write!(f, "storage"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Returns `CoreError::Cancelled` once the token has been cancelled.
///
/// # Errors
///
/// Returns an error if cancellation was requested.
pub fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), CoreError> {
    if cancel.is_cancelled() {
        Err(CoreError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_wire_values() {
        assert_eq!(ErrorCode::InvalidRequest.as_str(), "invalid_request");
        assert_eq!(
            ErrorCode::UnsupportedResponseType.as_str(),
            "unsupported_response_type"
        );
        assert_eq!(
            ErrorCode::TemporarilyUnavailable.to_string(),
            "temporarily_unavailable"
        );
    }

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidClient.http_status(), 401);
        assert_eq!(ErrorCode::InvalidGrant.http_status(), 400);
        assert_eq!(ErrorCode::ServerError.http_status(), 500);
    }

    #[test]
    fn test_protocol_error_serialization() {
        let error = ProtocolError::invalid_request("\"client_id\" is missing");
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(
            json,
            r#"{"error":"invalid_request","error_description":"\"client_id\" is missing"}"#
        );

        let bare = ProtocolError::bare(ErrorCode::AccessDenied);
        let json = serde_json::to_string(&bare).unwrap();
        assert_eq!(json, r#"{"error":"access_denied"}"#);
    }

    #[test]
    fn test_core_error_oauth_code() {
        let protocol: CoreError = ProtocolError::invalid_scope("nope").into();
        assert_eq!(protocol.oauth_error_code(), "invalid_scope");
        assert!(protocol.is_client_error());

        assert_eq!(CoreError::storage("down").oauth_error_code(), "server_error");
        assert_eq!(CoreError::Cancelled.oauth_error_code(), "server_error");
    }

    #[test]
    fn test_fatal_errors_do_not_leak_messages() {
        let error = CoreError::storage("connection refused to 10.0.0.7");
        let wire = error.to_protocol_error();
        assert_eq!(wire.error, ErrorCode::ServerError);
        assert!(wire.error_description.is_none());

        let error = CoreError::configuration("scope 'x' missing from catalog");
        let wire = error.to_protocol_error();
        assert_eq!(wire.error, ErrorCode::ServerError);
        assert_eq!(wire.error_description.as_deref(), Some("Misconfigured"));
    }

    #[test]
    fn test_invalid_registration_is_precondition() {
        let error: CoreError = ClientValidationError::InvalidClientId.into();
        assert!(matches!(error, CoreError::Precondition { .. }));
        assert_eq!(error.category(), ErrorCategory::Internal);
        assert!(error.to_protocol_error().error_description.is_none());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(CoreError::Cancelled.category(), ErrorCategory::Cancelled);
        assert_eq!(
            CoreError::issuance("signing key missing").category(),
            ErrorCategory::Internal
        );
        assert_eq!(ErrorCategory::Storage.to_string(), "storage");
    }

    #[test]
    fn test_ensure_not_cancelled() {
        let token = CancellationToken::new();
        assert!(ensure_not_cancelled(&token).is_ok());
        token.cancel();
        assert!(matches!(
            ensure_not_cancelled(&token),
            Err(CoreError::Cancelled)
        ));
    }
}

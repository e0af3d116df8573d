//! PKCE (Proof Key for Code Exchange) verification.
//!
//! Implements RFC 7636 with both the `plain` and `S256` methods. The stored
//! `code_challenge` is compared against the `code_verifier` presented at the
//! token endpoint:
//!
//! - `plain`: the verifier must equal the challenge.
//! - `S256`: `BASE64URL-DECODE(code_challenge)` must be exactly 32 bytes and
//!   equal `SHA256(ASCII(code_verifier))`.
//!
//! Both comparisons are constant-time, and the decoded challenge and the
//! computed hash are wiped before returning.
//!
//! # Example
//!
//! ```
//! use oidc_core::pkce::{CodeChallengeMethod, s256_challenge, verify};
//!
//! let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
//! let challenge = s256_challenge(verifier);
//! assert!(verify(verifier, &challenge, CodeChallengeMethod::S256).is_ok());
//! ```

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::config::InputLengthRestrictions;
use crate::error::ProtocolError;
use crate::params::{self, RequestParameters};
use crate::syntax;
use crate::types::AuthorizationCode;

const SHA256_LEN: usize = 32;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during PKCE operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PkceError {
    /// Verifier length is outside the configured range.
    #[error("Invalid verifier length: {0}")]
    InvalidVerifierLength(usize),

    /// Verifier contains characters outside `[A-Za-z0-9-._~]`.
    #[error("Invalid verifier characters")]
    InvalidVerifierCharacters,

    /// Challenge is not valid base64url or has the wrong decoded length.
    #[error("Invalid challenge format")]
    InvalidChallengeFormat,

    /// Unsupported challenge method.
    #[error("Unsupported challenge method: {0}")]
    UnsupportedMethod(String),

    /// The verifier does not match the challenge.
    #[error("PKCE verification failed: verifier does not match challenge")]
    VerificationFailed,
}

impl PkceError {
    /// Get the OAuth 2.0 error code for this error.
    ///
    /// A malformed stored challenge is indistinguishable, from the client's
    /// point of view, from a verifier that does not match it.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::InvalidVerifierLength(_)
            | Self::InvalidVerifierCharacters
            | Self::UnsupportedMethod(_) => "invalid_request",
            Self::InvalidChallengeFormat | Self::VerificationFailed => "invalid_grant",
        }
    }
}

// =============================================================================
// Challenge Method
// =============================================================================

/// PKCE challenge method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeChallengeMethod {
    /// The challenge is the verifier itself.
    #[serde(rename = "plain")]
    Plain,
    /// The challenge is the base64url-encoded SHA-256 of the verifier.
    #[serde(rename = "S256")]
    S256,
}

impl CodeChallengeMethod {
    /// Parse challenge method from string.
    ///
    /// # Errors
    ///
    /// Returns `PkceError::UnsupportedMethod` for anything other than
    /// `plain` or `S256`.
    pub fn parse(method: &str) -> Result<Self, PkceError> {
        match method {
            "plain" => Ok(Self::Plain),
            "S256" => Ok(Self::S256),
            other => Err(PkceError::UnsupportedMethod(other.to_string())),
        }
    }

    /// Get the method as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::S256 => "S256",
        }
    }
}

impl std::fmt::Display for CodeChallengeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Verification
// =============================================================================

/// Computes `BASE64URL(SHA256(ASCII(code_verifier)))`.
#[must_use]
pub fn s256_challenge(verifier: &str) -> String {
    let mut hash: [u8; SHA256_LEN] = Sha256::digest(verifier.as_bytes()).into();
    let challenge = URL_SAFE_NO_PAD.encode(hash);
    hash.zeroize();
    challenge
}

/// Checks the syntax and length of a `code_verifier`.
///
/// # Errors
///
/// Returns an error if the length is outside `min..=max` or the verifier
/// contains characters other than unreserved URI characters.
pub fn check_verifier(verifier: &str, min: usize, max: usize) -> Result<(), PkceError> {
    let len = verifier.len();
    if !(min..=max).contains(&len) {
        return Err(PkceError::InvalidVerifierLength(len));
    }
    if !syntax::is_unreserved(verifier) {
        return Err(PkceError::InvalidVerifierCharacters);
    }
    Ok(())
}

/// Verifies a `code_verifier` against a stored challenge.
///
/// # Errors
///
/// Returns `PkceError::VerificationFailed` if the verifier does not match and
/// `PkceError::InvalidChallengeFormat` if the stored S256 challenge does not
/// decode to a SHA-256 digest.
pub fn verify(
    verifier: &str,
    challenge: &str,
    method: CodeChallengeMethod,
) -> Result<(), PkceError> {
    if verifier.is_empty() || challenge.is_empty() {
        return Err(PkceError::VerificationFailed);
    }

    let matched = match method {
        CodeChallengeMethod::Plain => bool::from(verifier.as_bytes().ct_eq(challenge.as_bytes())),
        CodeChallengeMethod::S256 => {
            let mut decoded = URL_SAFE_NO_PAD
                .decode(challenge)
                .map_err(|_| PkceError::InvalidChallengeFormat)?;
            if decoded.len() != SHA256_LEN {
                decoded.zeroize();
                return Err(PkceError::InvalidChallengeFormat);
            }
            let mut hash: [u8; SHA256_LEN] = Sha256::digest(verifier.as_bytes()).into();
            let matched = bool::from(hash.as_slice().ct_eq(decoded.as_slice()));
            hash.zeroize();
            decoded.zeroize();
            matched
        }
    };

    if matched {
        Ok(())
    } else {
        Err(PkceError::VerificationFailed)
    }
}

// =============================================================================
// Token Endpoint Parameter
// =============================================================================

/// Validates the `code_verifier` token request parameter against the
/// challenge stored with the authorization code.
///
/// # Errors
///
/// Returns `invalid_request` for a missing, repeated or malformed verifier and
/// `invalid_grant` when it does not match the stored challenge.
pub fn validate_code_verifier(
    params: &RequestParameters,
    code: &AuthorizationCode,
    limits: &InputLengthRestrictions,
) -> Result<(), ProtocolError> {
    const NAME: &str = params::token::CODE_VERIFIER;

    let verifier = params
        .single(NAME, limits.code_verifier_max_length)
        .map_err(|e| e.into_protocol_error(NAME))?
        .ok_or_else(|| params::missing(NAME))?;

    match check_verifier(
        verifier,
        limits.code_verifier_min_length,
        limits.code_verifier_max_length,
    ) {
        Ok(()) => {}
        Err(PkceError::InvalidVerifierLength(_)) => {
            return Err(ProtocolError::invalid_request(format!(
                "\"{NAME}\" is too short"
            )));
        }
        Err(_) => return Err(params::invalid_syntax(NAME)),
    }

    verify(verifier, &code.code_challenge, code.code_challenge_method).map_err(|e| {
        tracing::warn!(
            client_id = %code.client_id,
            method = %code.code_challenge_method,
            error = %e,
            "PKCE verification failed"
        );
        ProtocolError::invalid_grant(format!("Invalid \"{NAME}\""))
    })
}

// =============================================================================
// Tests
// =============================================================================

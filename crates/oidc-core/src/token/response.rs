//! Successful token response assembly.

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;

use super::issuance::{
    AccessTokenIssuer, AccessTokenRequest, IdTokenIssuer, IdTokenRequest, IssuedToken,
    RefreshTokenIssuer, RefreshTokenRequest,
};
use super::request::ValidTokenRequest;
use crate::CoreResult;
use crate::config::ConfigHandle;
use crate::error::{CoreError, ensure_not_cancelled};
use crate::types::{EssentialClaims, RefreshToken};

/// Token endpoint success body.
///
/// ```json
/// {
///   "access_token": "eyJhbGciOiJSUzI1NiIs...",
///   "token_type": "Bearer",
///   "refresh_token": "tGzv3JOkF0XG5Qx2TlKWIA",
///   "expires_in": 3600,
///   "id_token": "eyJhbGciOiJSUzI1NiIs...",
///   "scope": "openid profile offline_access",
///   "iss": "https://auth.example.com"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessfulTokenResponse {
    pub access_token: String,

    /// Always "Bearer".
    pub token_type: String,

    /// Present when `offline_access` was granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Access token lifetime in seconds.
    pub expires_in: i64,

    /// Present when `openid` was granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    /// Granted scopes (space-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(rename = "iss")]
    pub issuer: String,
}

/// Invokes the issuers for a validated token request and builds the response.
#[derive(Clone)]
pub struct TokenResponseGenerator {
    config: ConfigHandle,
    access_tokens: Arc<dyn AccessTokenIssuer>,
    id_tokens: Arc<dyn IdTokenIssuer>,
    refresh_tokens: Arc<dyn RefreshTokenIssuer>,
}

impl TokenResponseGenerator {
    pub fn new(
        config: ConfigHandle,
        access_tokens: Arc<dyn AccessTokenIssuer>,
        id_tokens: Arc<dyn IdTokenIssuer>,
        refresh_tokens: Arc<dyn RefreshTokenIssuer>,
    ) -> Self {
        Self {
            config,
            access_tokens,
            id_tokens,
            refresh_tokens,
        }
    }

    /// Issues the tokens a validated request is entitled to.
    ///
    /// No response is produced unless every issuance succeeds.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Issuance` when an issuer fails, or
    /// `CoreError::Cancelled`.
    pub async fn create_response(
        &self,
        request: &ValidTokenRequest,
        cancel: &CancellationToken,
    ) -> CoreResult<SuccessfulTokenResponse> {
        ensure_not_cancelled(cancel)?;
        let config = self.config.snapshot();
        let issuer = config.issuer.as_str();
        let client = request.client();
        let resources = request.resources();
        let grant_type = request.grant_type();
        let issued_at = OffsetDateTime::now_utc();

        let access_token = self
            .access_tokens
            .create_access_token(
                AccessTokenRequest {
                    client,
                    issuer,
                    grant_type,
                    profile: request.profile(),
                    resources,
                    issued_at,
                },
                cancel,
            )
            .await
            .map_err(|e| issuance_failure("access token", e))?;

        let (essential_claims, nonce, previous) = grant_context(request);

        let mut id_token = None;
        if let (Some(profile), Some(essential_claims)) = (request.profile(), essential_claims)
            && resources.has_openid()
        {
            ensure_not_cancelled(cancel)?;
            let issued = self
                .id_tokens
                .create_id_token(
                    IdTokenRequest {
                        client,
                        issuer,
                        profile,
                        essential_claims,
                        resources,
                        access_token_handle: &access_token.handle,
                        nonce,
                        issued_at,
                    },
                    cancel,
                )
                .await
                .map_err(|e| issuance_failure("id token", e))?;
            id_token = Some(issued.handle);
        }

        let mut refresh_token = None;
        if let Some(essential_claims) = essential_claims
            && resources.has_offline_access()
        {
            ensure_not_cancelled(cancel)?;
            let issued = self
                .refresh_tokens
                .create_refresh_token(
                    RefreshTokenRequest {
                        client,
                        issuer,
                        essential_claims,
                        resources,
                        access_token: &access_token,
                        previous,
                        issued_at,
                    },
                    cancel,
                )
                .await
                .map_err(|e| issuance_failure("refresh token", e))?;
            refresh_token = Some(issued.handle);
        }

        tracing::info!(
            client_id = %client.client_id,
            grant_type = %grant_type,
            id_token = id_token.is_some(),
            refresh_token = refresh_token.is_some(),
            "Issued tokens"
        );

        Ok(build_response(
            access_token,
            id_token,
            refresh_token,
            resources.scope_string(),
            issuer,
        ))
    }
}

/// Resource-owner context carried by user-bound grants.
fn grant_context(
    request: &ValidTokenRequest,
) -> (Option<&EssentialClaims>, Option<&str>, Option<&RefreshToken>) {
    match request {
        ValidTokenRequest::AuthorizationCode(r) => {
            (Some(&r.code.essential_claims), r.code.nonce.as_deref(), None)
        }
        ValidTokenRequest::RefreshToken(r) => (
            Some(&r.refresh_token.essential_claims),
            None,
            Some(&r.refresh_token),
        ),
        ValidTokenRequest::ClientCredentials(_) => (None, None, None),
    }
}

fn issuance_failure(what: &str, error: CoreError) -> CoreError {
    if error.is_cancelled() {
        return error;
    }
    tracing::error!(error = %error, "Failed to issue {what}");
    CoreError::issuance(format!("failed to issue {what}: {error}"))
}

fn build_response(
    access_token: IssuedToken,
    id_token: Option<String>,
    refresh_token: Option<String>,
    scope: Option<String>,
    issuer: &str,
) -> SuccessfulTokenResponse {
    SuccessfulTokenResponse {
        access_token: access_token.handle,
        token_type: "Bearer".to_string(),
        refresh_token,
        expires_in: access_token.lifetime.whole_seconds(),
        id_token,
        scope,
        issuer: issuer.to_string(),
    }
}

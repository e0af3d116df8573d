//! `refresh_token` grant.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::scope::validate_granted_scope;
use crate::CoreResult;
use crate::config::{CoreConfig, InputLengthRestrictions};
use crate::error::{ProtocolError, ensure_not_cancelled};
use crate::params::{self, RequestParameters};
use crate::services::{ProfileService, ResourceService};
use crate::storage::{ConsentStorage, RefreshTokenStorage};
use crate::syntax;
use crate::types::{Client, GrantType, RefreshToken, ResourceOwnerProfile, ValidResources};

const INVALID_REFRESH_TOKEN: &str =
    "The provided refresh token is invalid, expired, revoked, or was issued to another client";

/// Validated `refresh_token` token request.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRefreshTokenRequest {
    pub client: Client,
    pub resources: ValidResources,
    /// Handle of the consumed refresh token.
    pub handle: String,
    pub refresh_token: RefreshToken,
    pub profile: ResourceOwnerProfile,
}

/// Validates the `refresh_token` parameter and consumes the token it names.
///
/// # Errors
///
/// Returns `invalid_request` for a missing, repeated, oversized or malformed
/// value and `invalid_grant` if the store does not know it.
pub async fn validate_refresh_token(
    params: &RequestParameters,
    limits: &InputLengthRestrictions,
    tokens: &dyn RefreshTokenStorage,
    cancel: &CancellationToken,
) -> CoreResult<(String, RefreshToken)> {
    const NAME: &str = params::token::REFRESH_TOKEN;
    ensure_not_cancelled(cancel)?;

    let handle = params
        .single(NAME, limits.refresh_token)
        .map_err(|e| e.into_protocol_error(NAME))?
        .ok_or_else(|| params::missing(NAME))?;
    if !syntax::is_vschar(handle) {
        return Err(params::invalid_syntax(NAME).into());
    }

    ensure_not_cancelled(cancel)?;
    match tokens.consume(handle, cancel).await? {
        Some(token) => Ok((handle.to_string(), token)),
        None => Err(ProtocolError::invalid_grant(INVALID_REFRESH_TOKEN).into()),
    }
}

/// Validates `refresh_token` token requests.
#[derive(Clone)]
pub struct RefreshTokenGrantValidator {
    tokens: Arc<dyn RefreshTokenStorage>,
    consents: Arc<dyn ConsentStorage>,
    profiles: Arc<dyn ProfileService>,
    resources: Arc<dyn ResourceService>,
}

impl RefreshTokenGrantValidator {
    /// Creates a validator.
    pub fn new(
        tokens: Arc<dyn RefreshTokenStorage>,
        consents: Arc<dyn ConsentStorage>,
        profiles: Arc<dyn ProfileService>,
        resources: Arc<dyn ResourceService>,
    ) -> Self {
        Self {
            tokens,
            consents,
            profiles,
            resources,
        }
    }

    /// Validates a request made by an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns the first protocol error, a collaborator failure, or
    /// `CoreError::Cancelled`.
    pub async fn validate(
        &self,
        params: &RequestParameters,
        client: &Client,
        config: &CoreConfig,
        cancel: &CancellationToken,
    ) -> CoreResult<ValidRefreshTokenRequest> {
        ensure_not_cancelled(cancel)?;
        let limits = &config.input_length_restrictions;

        if !client.is_grant_type_allowed(GrantType::RefreshToken) {
            return Err(super::unauthorized_grant().into());
        }

        let (handle, refresh_token) =
            validate_refresh_token(params, limits, self.tokens.as_ref(), cancel).await?;
        if refresh_token.client_id != client.client_id {
            tracing::warn!(
                client_id = %client.client_id,
                token_client_id = %refresh_token.client_id,
                "Refresh token presented by another client"
            );
            return Err(ProtocolError::invalid_grant(INVALID_REFRESH_TOKEN).into());
        }

        // Consent is checked before the scope parameter is even looked at.
        ensure_not_cancelled(cancel)?;
        let subject_id = refresh_token.essential_claims.subject_id();
        let consent = self.consents.find(subject_id, client, cancel).await?;
        if !consent.is_some_and(|c| c.covers(&refresh_token.granted_scopes)) {
            tracing::warn!(
                client_id = %client.client_id,
                subject_id = %subject_id,
                "Consent no longer covers refresh token scopes"
            );
            return Err(super::unauthorized_grant().into());
        }

        let resources = validate_granted_scope(
            params,
            client,
            &refresh_token.granted_scopes,
            limits,
            self.resources.as_ref(),
            cancel,
        )
        .await?;

        ensure_not_cancelled(cancel)?;
        let profile = self
            .profiles
            .get_profile(&refresh_token.essential_claims, &resources, cancel)
            .await?;
        if !profile.is_active {
            tracing::warn!(client_id = %client.client_id, subject_id = %subject_id, "Disabled user");
            return Err(ProtocolError::invalid_grant(
                "User account for provided refresh token has been disabled",
            )
            .into());
        }

        Ok(ValidRefreshTokenRequest {
            client: client.clone(),
            resources,
            handle,
            refresh_token,
            profile: profile.profile,
        })
    }
}

//! `authorization_code` grant.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::scope::validate_granted_scope;
use crate::CoreResult;
use crate::config::{CoreConfig, InputLengthRestrictions};
use crate::error::{ProtocolError, ensure_not_cancelled};
use crate::params::{self, RequestParameters};
use crate::pkce::validate_code_verifier;
use crate::services::{ProfileService, ResourceService};
use crate::storage::{AuthorizationCodeStorage, ConsentStorage};
use crate::syntax;
use crate::types::{AuthorizationCode, Client, GrantType, ResourceOwnerProfile, ValidResources};

const INVALID_CODE: &str = "The provided authorization code is invalid, expired, revoked, \
    does not match the redirect URI used in the authorization request, or was issued to another client";

/// Validated `authorization_code` token request.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidAuthorizationCodeRequest {
    pub client: Client,
    pub resources: ValidResources,
    /// Handle of the consumed code.
    pub handle: String,
    pub code: AuthorizationCode,
    pub profile: ResourceOwnerProfile,
}

/// Validates the `code` parameter and consumes the code it names.
///
/// # Errors
///
/// Returns `invalid_request` for a missing, repeated, oversized or malformed
/// code and `invalid_grant` if the store does not know it.
pub async fn validate_code(
    params: &RequestParameters,
    limits: &InputLengthRestrictions,
    codes: &dyn AuthorizationCodeStorage,
    cancel: &CancellationToken,
) -> CoreResult<(String, AuthorizationCode)> {
    const NAME: &str = params::token::CODE;
    ensure_not_cancelled(cancel)?;

    let handle = params
        .single(NAME, limits.code)
        .map_err(|e| e.into_protocol_error(NAME))?
        .ok_or_else(|| params::missing(NAME))?;
    if !syntax::is_vschar(handle) {
        return Err(params::invalid_syntax(NAME).into());
    }

    ensure_not_cancelled(cancel)?;
    match codes.consume(handle, cancel).await? {
        Some(code) => Ok((handle.to_string(), code)),
        None => Err(ProtocolError::invalid_grant(INVALID_CODE).into()),
    }
}

/// Checks the optional token request `redirect_uri` against the one the code
/// was delivered to.
fn validate_redirect_binding(
    params: &RequestParameters,
    code: &AuthorizationCode,
    limits: &InputLengthRestrictions,
) -> Result<(), ProtocolError> {
    const NAME: &str = params::token::REDIRECT_URI;

    let Some(raw) = params
        .single(NAME, limits.redirect_uri)
        .map_err(|e| e.into_protocol_error(NAME))?
    else {
        return Ok(());
    };
    if syntax::parse_redirect_uri(raw).is_none() {
        return Err(params::invalid_syntax(NAME));
    }
    match &code.redirect_uri {
        Some(expected) if expected != raw => Err(ProtocolError::invalid_grant(INVALID_CODE)),
        _ => Ok(()),
    }
}

/// Validates `authorization_code` token requests.
#[derive(Clone)]
pub struct AuthorizationCodeGrantValidator {
    codes: Arc<dyn AuthorizationCodeStorage>,
    consents: Arc<dyn ConsentStorage>,
    profiles: Arc<dyn ProfileService>,
    resources: Arc<dyn ResourceService>,
}

impl AuthorizationCodeGrantValidator {
    /// Creates a validator.
    pub fn new(
        codes: Arc<dyn AuthorizationCodeStorage>,
        consents: Arc<dyn ConsentStorage>,
        profiles: Arc<dyn ProfileService>,
        resources: Arc<dyn ResourceService>,
    ) -> Self {
        Self {
            codes,
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
    ) -> CoreResult<ValidAuthorizationCodeRequest> {
        ensure_not_cancelled(cancel)?;
        let limits = &config.input_length_restrictions;

        // 1. Client must be allowed to use the grant
        if !client.is_grant_type_allowed(GrantType::AuthorizationCode) {
            return Err(super::unauthorized_grant().into());
        }

        // 2. Consume the code
        let (handle, code) = validate_code(params, limits, self.codes.as_ref(), cancel).await?;

        // 3. Code must belong to the authenticated client
        if code.client_id != client.client_id {
            tracing::warn!(
                client_id = %client.client_id,
                code_client_id = %code.client_id,
                "Authorization code presented by another client"
            );
            return Err(ProtocolError::invalid_grant(INVALID_CODE).into());
        }
        validate_redirect_binding(params, &code, limits)?;

        // 4. PKCE
        validate_code_verifier(params, &code, limits)?;

        // 5. Consent must still cover the granted scopes
        ensure_not_cancelled(cancel)?;
        let subject_id = code.essential_claims.subject_id();
        let consent = self.consents.find(subject_id, client, cancel).await?;
        if !consent.is_some_and(|c| c.covers(&code.granted_scopes)) {
            tracing::warn!(
                client_id = %client.client_id,
                subject_id = %subject_id,
                "Consent no longer covers authorization code scopes"
            );
            return Err(super::unauthorized_grant().into());
        }

        // 6. Scope may only narrow the grant
        let resources = validate_granted_scope(
            params,
            client,
            &code.granted_scopes,
            limits,
            self.resources.as_ref(),
            cancel,
        )
        .await?;

        // 7. Resource owner must still be active
        ensure_not_cancelled(cancel)?;
        let profile = self
            .profiles
            .get_profile(&code.essential_claims, &resources, cancel)
            .await?;
        if !profile.is_active {
            tracing::warn!(client_id = %client.client_id, subject_id = %subject_id, "Disabled user");
            return Err(ProtocolError::invalid_grant(
                "User account for provided authorization code has been disabled",
            )
            .into());
        }

        Ok(ValidAuthorizationCodeRequest {
            client: client.clone(),
            resources,
            handle,
            code,
            profile: profile.profile,
        })
    }
}

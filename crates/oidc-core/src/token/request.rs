//! Token request dispatch by `grant_type`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::authorization_code::{AuthorizationCodeGrantValidator, ValidAuthorizationCodeRequest};
use super::client_credentials::{ClientCredentialsGrantValidator, ValidClientCredentialsRequest};
use super::refresh_token::{RefreshTokenGrantValidator, ValidRefreshTokenRequest};
use crate::CoreResult;
use crate::config::ConfigHandle;
use crate::error::{ProtocolError, ensure_not_cancelled};
use crate::params::{self, RequestParameters};
use crate::services::{ProfileService, ResourceService};
use crate::storage::{AuthorizationCodeStorage, ConsentStorage, RefreshTokenStorage};
use crate::types::{Client, GrantType, ResourceOwnerProfile, ValidResources};

/// Validated token request, one variant per grant.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidTokenRequest {
    AuthorizationCode(ValidAuthorizationCodeRequest),
    ClientCredentials(ValidClientCredentialsRequest),
    RefreshToken(ValidRefreshTokenRequest),
}

impl ValidTokenRequest {
    /// Returns the grant type being exercised.
    #[must_use]
    pub fn grant_type(&self) -> GrantType {
        match self {
            Self::AuthorizationCode(_) => GrantType::AuthorizationCode,
            Self::ClientCredentials(_) => GrantType::ClientCredentials,
            Self::RefreshToken(_) => GrantType::RefreshToken,
        }
    }

    /// Returns the authenticated client.
    #[must_use]
    pub fn client(&self) -> &Client {
        match self {
            Self::AuthorizationCode(r) => &r.client,
            Self::ClientCredentials(r) => &r.client,
            Self::RefreshToken(r) => &r.client,
        }
    }

    /// Returns the resources granted for this request.
    #[must_use]
    pub fn resources(&self) -> &ValidResources {
        match self {
            Self::AuthorizationCode(r) => &r.resources,
            Self::ClientCredentials(r) => &r.resources,
            Self::RefreshToken(r) => &r.resources,
        }
    }

    /// Returns the resource-owner profile; `None` for `client_credentials`.
    #[must_use]
    pub fn profile(&self) -> Option<&ResourceOwnerProfile> {
        match self {
            Self::AuthorizationCode(r) => Some(&r.profile),
            Self::ClientCredentials(_) => None,
            Self::RefreshToken(r) => Some(&r.profile),
        }
    }
}

/// Validates token requests for an already authenticated client.
#[derive(Clone)]
pub struct TokenRequestValidator {
    config: ConfigHandle,
    authorization_code: AuthorizationCodeGrantValidator,
    client_credentials: ClientCredentialsGrantValidator,
    refresh_token: RefreshTokenGrantValidator,
}

impl TokenRequestValidator {
    /// Creates a validator wired to the given collaborators.
    pub fn new(
        config: ConfigHandle,
        codes: Arc<dyn AuthorizationCodeStorage>,
        refresh_tokens: Arc<dyn RefreshTokenStorage>,
        consents: Arc<dyn ConsentStorage>,
        profiles: Arc<dyn ProfileService>,
        resources: Arc<dyn ResourceService>,
    ) -> Self {
        Self {
            config,
            authorization_code: AuthorizationCodeGrantValidator::new(
                codes,
                consents.clone(),
                profiles.clone(),
                resources.clone(),
            ),
            client_credentials: ClientCredentialsGrantValidator::new(resources.clone()),
            refresh_token: RefreshTokenGrantValidator::new(
                refresh_tokens,
                consents,
                profiles,
                resources,
            ),
        }
    }

    /// Validates a token request.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` for a missing or malformed `grant_type`,
    /// `unsupported_grant_type` for unknown grants, a precondition error for
    /// an invalid client registration, or the grant pipeline's error.
    pub async fn validate(
        &self,
        params: &RequestParameters,
        client: &Client,
        cancel: &CancellationToken,
    ) -> CoreResult<ValidTokenRequest> {
        const NAME: &str = params::token::GRANT_TYPE;
        ensure_not_cancelled(cancel)?;
        client.validate().inspect_err(|e| {
            tracing::error!(client_id = %client.client_id, error = %e, "Authenticated client registration is invalid");
        })?;
        let config = self.config.snapshot();

        let raw = params
            .single(NAME, config.input_length_restrictions.grant_type)
            .map_err(|e| e.into_protocol_error(NAME))?
            .ok_or_else(|| params::missing(NAME))?;

        let Some(grant_type) = GrantType::parse_token_grant(raw) else {
            tracing::debug!(client_id = %client.client_id, grant_type = %raw, "Unsupported grant type");
            return Err(ProtocolError::unsupported_grant_type(format!("Unsupported \"{NAME}\"")).into());
        };

        tracing::debug!(client_id = %client.client_id, grant_type = %grant_type, "Validating token request");
        let result = match grant_type {
            GrantType::AuthorizationCode => self
                .authorization_code
                .validate(params, client, &config, cancel)
                .await
                .map(ValidTokenRequest::AuthorizationCode),
            GrantType::ClientCredentials => self
                .client_credentials
                .validate(params, client, &config, cancel)
                .await
                .map(ValidTokenRequest::ClientCredentials),
            GrantType::RefreshToken => self
                .refresh_token
                .validate(params, client, &config, cancel)
                .await
                .map(ValidTokenRequest::RefreshToken),
            GrantType::Implicit => Err(ProtocolError::unsupported_grant_type(format!(
                "Unsupported \"{NAME}\""
            ))
            .into()),
        };

        if let Err(error) = &result {
            tracing::debug!(
                client_id = %client.client_id,
                grant_type = %grant_type,
                error = %error,
                "Token request rejected"
            );
        }
        result
    }
}

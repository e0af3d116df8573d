//! Authorize request validation.
//!
//! # Redirect safety
//!
//! Errors raised before `client_id` and `redirect_uri` are both trusted are
//! never redirected; the transport must render them directly. From then on,
//! errors travel back to the client through the validated redirect URI and
//! response mode. [`AuthorizeRequestError::is_redirect_safe`] tells the two
//! apart.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::oidc::validate_nonce;
use super::pkce::{CodeChallenge, validate_code_challenge};
use super::required::{RequiredParameters, RequiredParametersValidator};
use super::scope::validate_scope;
use crate::config::{ConfigHandle, CoreConfig};
use crate::error::{CoreError, ProtocolError, ensure_not_cancelled};
use crate::params::{self, RequestParameters};
use crate::services::ResourceService;
use crate::storage::ClientStorage;
use crate::types::{Client, OPENID, ResponseMode, ResponseType, ValidResources};

/// Fully validated authorize request.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAuthorizeRequest {
    pub client: Client,
    pub response_type: ResponseType,
    pub response_mode: ResponseMode,
    pub state: Option<String>,
    pub redirect_uri: String,
    pub resources: ValidResources,
    pub nonce: Option<String>,
    /// Present whenever the response type includes `code`.
    pub code_challenge: Option<CodeChallenge>,
    pub is_openid_request: bool,
}

/// Failed authorize request validation.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct AuthorizeRequestError {
    required: Option<Box<RequiredParameters>>,
    error: CoreError,
}

impl AuthorizeRequestError {
    fn direct(error: CoreError) -> Self {
        Self {
            required: None,
            error,
        }
    }

    fn redirect(required: RequiredParameters, error: CoreError) -> Self {
        Self {
            required: Some(Box::new(required)),
            error,
        }
    }

    /// Returns `true` if the error may be delivered through the redirect URI.
    ///
    /// Once the redirect target is trusted, fatal errors are redirected too
    /// (as `server_error`). Cancellation never is.
    #[must_use]
    pub fn is_redirect_safe(&self) -> bool {
        self.required.is_some() && !self.error.is_cancelled()
    }

    /// Returns the trusted redirect target, if the error is redirect-safe.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&RequiredParameters> {
        if self.is_redirect_safe() {
            self.required.as_deref()
        } else {
            None
        }
    }

    /// Returns the error pair to show the client.
    #[must_use]
    pub fn protocol_error(&self) -> ProtocolError {
        self.error.to_protocol_error()
    }

    /// Returns the underlying error.
    #[must_use]
    pub fn error(&self) -> &CoreError {
        &self.error
    }
}

/// Validates authorize endpoint requests.
///
/// # Example
///
/// ```ignore
/// let validator = AuthorizeRequestValidator::new(config, clients, resources);
/// match validator.validate(&params, &cancel).await {
///     Ok(request) => { /* authenticate, consent, issue code */ }
///     Err(e) if e.is_redirect_safe() => { /* redirect with e.protocol_error() */ }
///     Err(e) => { /* render e.protocol_error() directly */ }
/// }
/// ```
#[derive(Clone)]
pub struct AuthorizeRequestValidator {
    config: ConfigHandle,
    required: RequiredParametersValidator,
    resources: Arc<dyn ResourceService>,
}

impl AuthorizeRequestValidator {
    /// Creates a validator.
    pub fn new(
        config: ConfigHandle,
        clients: Arc<dyn ClientStorage>,
        resources: Arc<dyn ResourceService>,
    ) -> Self {
        Self {
            config,
            required: RequiredParametersValidator::new(clients),
            resources,
        }
    }

    /// Validates an authorize request.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthorizeRequestError`] describing the first failure and
    /// whether it may be redirected.
    pub async fn validate(
        &self,
        params: &RequestParameters,
        cancel: &CancellationToken,
    ) -> Result<ValidatedAuthorizeRequest, AuthorizeRequestError> {
        ensure_not_cancelled(cancel).map_err(AuthorizeRequestError::direct)?;
        let config = self.config.snapshot();

        let required = match self.required.validate(params, &config, cancel).await {
            Ok(required) => required,
            Err(error) => {
                tracing::debug!(error = %error, "Authorize request rejected before redirect URI was established");
                return Err(AuthorizeRequestError::direct(error));
            }
        };

        match self.validate_optional(params, &required, &config, cancel).await {
            Ok((resources, nonce, code_challenge, is_openid_request)) => {
                tracing::debug!(
                    client_id = %required.client.client_id,
                    response_type = %required.response_type,
                    response_mode = %required.response_mode,
                    "Authorize request validated"
                );
                Ok(ValidatedAuthorizeRequest {
                    client: required.client,
                    response_type: required.response_type,
                    response_mode: required.response_mode,
                    state: required.state,
                    redirect_uri: required.redirect_uri,
                    resources,
                    nonce,
                    code_challenge,
                    is_openid_request,
                })
            }
            Err(error) => {
                tracing::debug!(
                    client_id = %required.client.client_id,
                    error = %error,
                    "Authorize request rejected"
                );
                Err(AuthorizeRequestError::redirect(required, error))
            }
        }
    }

    async fn validate_optional(
        &self,
        params: &RequestParameters,
        required: &RequiredParameters,
        config: &CoreConfig,
        cancel: &CancellationToken,
    ) -> Result<(ValidResources, Option<String>, Option<CodeChallenge>, bool), CoreError> {
        let limits = &config.input_length_restrictions;
        let is_openid_request =
            requests_openid_scope(params) || required.response_type.includes_id_token();

        let resources = validate_scope(
            params,
            &required.client,
            is_openid_request,
            limits,
            self.resources.as_ref(),
            cancel,
        )
        .await?;
        let nonce = validate_nonce(params, required.response_type, limits)?;
        let code_challenge = validate_code_challenge(params, required.response_type, config)?;

        Ok((resources, nonce, code_challenge, is_openid_request))
    }
}

fn requests_openid_scope(params: &RequestParameters) -> bool {
    params
        .values(params::authorize::SCOPE)
        .iter()
        .any(|value| value.split(' ').any(|scope| scope == OPENID))
}

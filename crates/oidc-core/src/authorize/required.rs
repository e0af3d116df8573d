//! Parameters that must validate before any error may be redirected.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::client_id::validate_client_id;
use super::redirect_uri::validate_redirect_uri;
use super::response::{validate_response_mode, validate_response_type};
use super::state::validate_state;
use crate::CoreResult;
use crate::config::CoreConfig;
use crate::error::ensure_not_cancelled;
use crate::params::RequestParameters;
use crate::storage::ClientStorage;
use crate::types::{Client, ResponseMode, ResponseType};

/// Client and response target of an authorize request.
///
/// Once this bundle exists, the redirect URI is trusted and every later
/// error is returned to the client through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredParameters {
    pub client: Client,
    pub response_type: ResponseType,
    pub response_mode: ResponseMode,
    pub state: Option<String>,
    pub redirect_uri: String,
}

/// Validates `client_id`, `response_type`, `response_mode`, `state` and
/// `redirect_uri`, in that order, stopping at the first error.
#[derive(Clone)]
pub struct RequiredParametersValidator {
    clients: Arc<dyn ClientStorage>,
}

impl RequiredParametersValidator {
    /// Creates a validator backed by the given client storage.
    pub fn new(clients: Arc<dyn ClientStorage>) -> Self {
        Self { clients }
    }

    /// Validates the required parameters.
    ///
    /// # Errors
    ///
    /// Returns the first protocol error encountered, a storage error from the
    /// client lookup, or `CoreError::Cancelled`.
    pub async fn validate(
        &self,
        params: &RequestParameters,
        config: &CoreConfig,
        cancel: &CancellationToken,
    ) -> CoreResult<RequiredParameters> {
        ensure_not_cancelled(cancel)?;
        let limits = &config.input_length_restrictions;

        let client = validate_client_id(params, limits, self.clients.as_ref(), cancel).await?;
        let response_type = validate_response_type(params, &client, limits)?;
        let response_mode = validate_response_mode(params, response_type, config)?;
        let state = validate_state(params, limits)?;
        let redirect_uri = validate_redirect_uri(params, &client, limits)?;

        Ok(RequiredParameters {
            client,
            response_type,
            response_mode,
            state,
            redirect_uri,
        })
    }
}

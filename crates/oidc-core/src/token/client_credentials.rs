//! `client_credentials` grant.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::scope::validate_client_scope;
use crate::CoreResult;
use crate::config::CoreConfig;
use crate::error::ensure_not_cancelled;
use crate::params::RequestParameters;
use crate::services::ResourceService;
use crate::types::{Client, GrantType, ValidResources};

/// Validated `client_credentials` token request.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidClientCredentialsRequest {
    pub client: Client,
    pub resources: ValidResources,
}

/// Validates `client_credentials` token requests.
#[derive(Clone)]
pub struct ClientCredentialsGrantValidator {
    resources: Arc<dyn ResourceService>,
}

impl ClientCredentialsGrantValidator {
    /// Creates a validator.
    pub fn new(resources: Arc<dyn ResourceService>) -> Self {
        Self { resources }
    }

    /// Validates a request made by an authenticated client.
    ///
    /// # Errors
    ///
    /// Returns `unauthorized_client` if the client may not use the grant,
    /// scope errors, or `CoreError::Cancelled`.
    pub async fn validate(
        &self,
        params: &RequestParameters,
        client: &Client,
        config: &CoreConfig,
        cancel: &CancellationToken,
    ) -> CoreResult<ValidClientCredentialsRequest> {
        ensure_not_cancelled(cancel)?;

        if !client.is_grant_type_allowed(GrantType::ClientCredentials) {
            return Err(super::unauthorized_grant().into());
        }

        let resources = validate_client_scope(
            params,
            client,
            &config.input_length_restrictions,
            self.resources.as_ref(),
            cancel,
        )
        .await?;

        Ok(ValidClientCredentialsRequest {
            client: client.clone(),
            resources,
        })
    }
}

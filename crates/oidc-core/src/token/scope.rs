//! `scope` parameter at the token endpoint.

use indexmap::IndexSet;
use tokio_util::sync::CancellationToken;

use crate::CoreResult;
use crate::config::InputLengthRestrictions;
use crate::error::{ProtocolError, ensure_not_cancelled};
use crate::params::RequestParameters;
use crate::scope;
use crate::services::ResourceService;
use crate::types::{Client, OPENID, TokenTypeFilter, ValidResources};

/// Resolves the scope of a grant exchanged for tokens.
///
/// Without a `scope` parameter the whole grant is used. A requested scope
/// may only narrow the grant.
///
/// # Errors
///
/// Returns `invalid_request` for a malformed parameter and `invalid_scope`
/// for scopes outside the grant or rejected by resolution.
pub async fn validate_granted_scope(
    params: &RequestParameters,
    client: &Client,
    granted: &IndexSet<String>,
    limits: &InputLengthRestrictions,
    resources: &dyn ResourceService,
    cancel: &CancellationToken,
) -> CoreResult<ValidResources> {
    ensure_not_cancelled(cancel)?;

    let requested = match scope::read_scope(params, limits)? {
        Some(requested) => {
            if !requested.is_subset(granted) {
                tracing::debug!(client_id = %client.client_id, "Requested scope exceeds the grant");
                return Err(ProtocolError::invalid_scope("Invalid \"scope\"").into());
            }
            requested
        }
        None => granted.clone(),
    };

    let filter = TokenTypeFilter::for_openid(requested.contains(OPENID));
    scope::resolve(resources, client, &requested, filter, cancel).await
}

/// Resolves the scope of a `client_credentials` request.
///
/// Without a `scope` parameter the client's default scopes are used (or
/// every access token scope it may request when no defaults are configured).
///
/// # Errors
///
/// Returns `invalid_request` for a malformed parameter and `invalid_scope`
/// for scopes rejected by resolution.
pub async fn validate_client_scope(
    params: &RequestParameters,
    client: &Client,
    limits: &InputLengthRestrictions,
    resources: &dyn ResourceService,
    cancel: &CancellationToken,
) -> CoreResult<ValidResources> {
    ensure_not_cancelled(cancel)?;

    let filter = TokenTypeFilter::AccessToken;
    let requested = match scope::read_scope(params, limits)? {
        Some(requested) => requested,
        None => scope::default_scopes(resources, client, filter, cancel).await?,
    };

    scope::resolve(resources, client, &requested, filter, cancel).await
}

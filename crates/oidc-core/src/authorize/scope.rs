//! `scope` parameter at the authorize endpoint.

use tokio_util::sync::CancellationToken;

use crate::CoreResult;
use crate::config::InputLengthRestrictions;
use crate::error::{ProtocolError, ensure_not_cancelled};
use crate::params::{self, RequestParameters};
use crate::scope;
use crate::services::ResourceService;
use crate::types::{Client, OPENID, TokenTypeFilter, ValidResources};

/// Resolves the requested scopes.
///
/// A plain OAuth request without `scope` falls back to the client's default
/// scopes (or every access token scope it may request when no defaults are
/// configured). OpenID requests get no such fallback and must carry `openid`.
///
/// # Errors
///
/// Returns `invalid_request` for a missing or malformed `scope`,
/// `invalid_scope` when resolution rejects the scopes, and a configuration
/// error when client and scope definitions disagree.
pub async fn validate_scope(
    params: &RequestParameters,
    client: &Client,
    is_openid_request: bool,
    limits: &InputLengthRestrictions,
    resources: &dyn ResourceService,
    cancel: &CancellationToken,
) -> CoreResult<ValidResources> {
    ensure_not_cancelled(cancel)?;

    let filter = TokenTypeFilter::for_openid(is_openid_request);
    let requested = match scope::read_scope(params, limits)? {
        Some(requested) => requested,
        None if is_openid_request => return Err(params::missing(params::authorize::SCOPE).into()),
        None => scope::default_scopes(resources, client, filter, cancel).await?,
    };

    if is_openid_request && !requested.contains(OPENID) {
        return Err(ProtocolError::invalid_request(
            "\"openid\" scope is required for this \"response_type\"",
        )
        .into());
    }

    scope::resolve(resources, client, &requested, filter, cancel).await
}

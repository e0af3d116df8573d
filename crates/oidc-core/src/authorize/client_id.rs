//! `client_id` parameter.

use tokio_util::sync::CancellationToken;

use crate::CoreResult;
use crate::config::InputLengthRestrictions;
use crate::error::{ProtocolError, ensure_not_cancelled};
use crate::params::{self, RequestParameters};
use crate::storage::ClientStorage;
use crate::syntax;
use crate::types::Client;

const NAME: &str = params::authorize::CLIENT_ID;

/// Validates `client_id` and loads the enabled client it names.
///
/// # Errors
///
/// Returns `invalid_request` for a missing, repeated, oversized or malformed
/// identifier, `unauthorized_client` if no enabled client matches, and a
/// precondition error if the stored registration is invalid.
pub async fn validate_client_id(
    params: &RequestParameters,
    limits: &InputLengthRestrictions,
    clients: &dyn ClientStorage,
    cancel: &CancellationToken,
) -> CoreResult<Client> {
    ensure_not_cancelled(cancel)?;

    let client_id = params
        .single(NAME, limits.client_id)
        .map_err(|e| e.into_protocol_error(NAME))?
        .ok_or_else(|| params::missing(NAME))?;

    if !syntax::is_vschar(client_id) {
        return Err(params::invalid_syntax(NAME).into());
    }

    ensure_not_cancelled(cancel)?;
    match clients.find_enabled(client_id, cancel).await? {
        Some(client) => {
            client.validate().inspect_err(|e| {
                tracing::error!(client_id = %client.client_id, error = %e, "Stored client registration is invalid");
            })?;
            Ok(client)
        }
        None => {
            tracing::debug!(client_id = %client_id, "Unknown or disabled client");
            Err(ProtocolError::unauthorized_client("Unknown or disabled client").into())
        }
    }
}

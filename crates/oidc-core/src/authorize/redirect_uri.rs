//! `redirect_uri` parameter.
//!
//! The parameter is always required, even for clients with a single
//! registered URI.
//!
//! Loopback redirects (native apps listening on an ephemeral port, RFC 8252
//! section 7.3) match a registered loopback URI with any port, as long as
//! scheme, host, path and query are identical. Every other redirect must
//! equal a registered URI exactly and must not use plain `http`.

use url::Url;

use crate::config::InputLengthRestrictions;
use crate::error::ProtocolError;
use crate::params::{self, RequestParameters};
use crate::syntax;
use crate::types::Client;

const NAME: &str = params::authorize::REDIRECT_URI;

/// Validates `redirect_uri` against the client's registered URIs.
///
/// # Errors
///
/// Returns `invalid_request` when the URI is missing, repeated, too long,
/// malformed, or not registered for the client.
pub fn validate_redirect_uri(
    params: &RequestParameters,
    client: &Client,
    limits: &InputLengthRestrictions,
) -> Result<String, ProtocolError> {
    let raw = params
        .single(NAME, limits.redirect_uri)
        .map_err(|e| e.into_protocol_error(NAME))?
        .ok_or_else(|| params::missing(NAME))?;

    let requested = syntax::parse_redirect_uri(raw).ok_or_else(|| params::invalid_syntax(NAME))?;

    let matched = if is_loopback_uri(&requested) {
        client
            .redirect_uris
            .iter()
            .filter_map(|registered| syntax::parse_redirect_uri(registered))
            .any(|registered| loopback_matches(&registered, &requested))
    } else {
        requested.scheme() != "http" && client.redirect_uris.iter().any(|r| r == raw)
    };

    if !matched {
        tracing::debug!(client_id = %client.client_id, redirect_uri = %raw, "Redirect URI not registered");
        return Err(ProtocolError::invalid_request(format!("Invalid \"{NAME}\"")));
    }
    Ok(raw.to_string())
}

fn is_loopback_uri(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && syntax::is_loopback(url)
}

/// Compares two loopback URIs ignoring the port.
fn loopback_matches(registered: &Url, requested: &Url) -> bool {
    is_loopback_uri(registered)
        && registered.scheme() == requested.scheme()
        && registered.host() == requested.host()
        && registered.path() == requested.path()
        && registered.query() == requested.query()
}

//! `scope` parameter parsing and resolution shared by both endpoints.
//!
//! Bounds are checked in one fixed order: whole parameter length, then
//! splitting into a set, then each entry's length and syntax.

use indexmap::IndexSet;
use tokio_util::sync::CancellationToken;

use crate::CoreResult;
use crate::config::InputLengthRestrictions;
use crate::error::{CoreError, ProtocolError, ensure_not_cancelled};
use crate::params::{self, RequestParameters};
use crate::services::{ResourceService, ResourceValidationError};
use crate::syntax;
use crate::types::{Client, TokenTypeFilter, ValidResources};

const NAME: &str = "scope";

/// Reads the `scope` parameter.
///
/// Returns `Ok(None)` when it is absent or empty.
///
/// # Errors
///
/// Returns `invalid_request` if the parameter is repeated, too long, or
/// contains an entry that is too long or not a valid scope token.
pub fn read_scope(
    params: &RequestParameters,
    limits: &InputLengthRestrictions,
) -> Result<Option<IndexSet<String>>, ProtocolError> {
    let Some(raw) = params
        .single(NAME, limits.scope)
        .map_err(|e| e.into_protocol_error(NAME))?
    else {
        return Ok(None);
    };

    let mut scopes = IndexSet::new();
    for entry in raw.split(' ') {
        if entry.len() > limits.scope_entry {
            return Err(params::too_long(NAME));
        }
        if !syntax::is_scope_token(entry) {
            return Err(params::invalid_syntax(NAME));
        }
        scopes.insert(entry.to_string());
    }
    Ok(Some(scopes))
}

/// Resolves scopes through the resource service, mapping its failures.
///
/// Configuration errors become [`CoreError::Configuration`] (rendered as
/// `server_error`); everything request-related becomes `invalid_scope`.
///
/// # Errors
///
/// Returns `invalid_scope`, a configuration error, or the collaborator's own
/// failure.
pub async fn resolve(
    resources: &dyn ResourceService,
    client: &Client,
    requested: &IndexSet<String>,
    filter: TokenTypeFilter,
    cancel: &CancellationToken,
) -> CoreResult<ValidResources> {
    ensure_not_cancelled(cancel)?;
    resources
        .validate_requested_scopes(client, requested, filter, cancel)
        .await
        .map_err(|e| resource_error(client, e))
}

/// Scopes to resolve when the request has no `scope` parameter.
///
/// # Errors
///
/// Same as [`resolve`].
pub async fn default_scopes(
    resources: &dyn ResourceService,
    client: &Client,
    filter: TokenTypeFilter,
    cancel: &CancellationToken,
) -> CoreResult<IndexSet<String>> {
    ensure_not_cancelled(cancel)?;
    resources
        .default_scopes(client, filter, cancel)
        .await
        .map_err(|e| resource_error(client, e))
}

fn resource_error(client: &Client, error: ResourceValidationError) -> CoreError {
    match error {
        ResourceValidationError::InvalidScope(reason) => {
            tracing::debug!(client_id = %client.client_id, reason = %reason, "Invalid scope requested");
            ProtocolError::invalid_scope(format!("Invalid \"{NAME}\"")).into()
        }
        ResourceValidationError::Configuration(message) => {
            tracing::error!(client_id = %client.client_id, error = %message, "Scope configuration error");
            CoreError::configuration(message)
        }
        ResourceValidationError::Core(error) => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ScopeCatalog;
    use tokio_test::block_on;

    fn read(raw: &str) -> Result<Option<IndexSet<String>>, ProtocolError> {
        read_scope(
            &RequestParameters::new().with("scope", raw),
            &InputLengthRestrictions::default(),
        )
    }

    #[test]
    fn test_splits_into_ordered_set() {
        let scopes = read("openid profile openid email").unwrap().unwrap();
        let scopes: Vec<_> = scopes.iter().map(String::as_str).collect();
        assert_eq!(scopes, ["openid", "profile", "email"]);
    }

    #[test]
    fn test_absent_or_empty() {
        assert_eq!(read("").unwrap(), None);
        assert_eq!(
            read_scope(&RequestParameters::new(), &Default::default()).unwrap(),
            None
        );
    }

    #[test]
    fn test_double_space_is_invalid_syntax() {
        let error = read("openid  profile").unwrap_err();
        assert_eq!(
            error.error_description.as_deref(),
            Some("Invalid \"scope\" syntax")
        );
    }

    #[test]
    fn test_length_checks_in_order() {
        let limits = InputLengthRestrictions {
            scope: 20,
            scope_entry: 5,
            ..Default::default()
        };
        let whole = RequestParameters::new().with("scope", "a".repeat(21));
        assert_eq!(
            read_scope(&whole, &limits).unwrap_err().error_description.as_deref(),
            Some("\"scope\" is too long")
        );
        let entry = RequestParameters::new().with("scope", "abc abcdef");
        assert_eq!(
            read_scope(&entry, &limits).unwrap_err().error_description.as_deref(),
            Some("\"scope\" is too long")
        );
    }

    #[test]
    fn test_multiple_values() {
        let params = RequestParameters::new().with("scope", "a").with("scope", "b");
        assert!(read_scope(&params, &Default::default()).is_err());
    }

    #[test]
    fn test_resolve_maps_resource_errors() {
        let catalog = ScopeCatalog::with_standard_scopes();
        let client = Client::new("app").with_scopes(["openid", "profile", "billing"]);
        let cancel = CancellationToken::new();
        let requested = |items: &[&str]| -> IndexSet<String> {
            items.iter().map(|s| (*s).to_string()).collect()
        };

        block_on(async {
            let valid = resolve(
                &catalog,
                &client,
                &requested(&["openid", "profile"]),
                TokenTypeFilter::IdTokenAndAccessToken,
                &cancel,
            )
            .await
            .unwrap();
            assert!(valid.has_openid());

            let error = resolve(
                &catalog,
                &client,
                &requested(&["email"]),
                TokenTypeFilter::IdTokenAndAccessToken,
                &cancel,
            )
            .await
            .unwrap_err();
            assert_eq!(
                error.to_protocol_error(),
                ProtocolError::invalid_scope("Invalid \"scope\"")
            );

            let error = resolve(
                &catalog,
                &client,
                &requested(&["billing"]),
                TokenTypeFilter::AccessToken,
                &cancel,
            )
            .await
            .unwrap_err();
            assert!(matches!(error, CoreError::Configuration { .. }));

            cancel.cancel();
            let error = resolve(
                &catalog,
                &client,
                &requested(&["openid"]),
                TokenTypeFilter::IdTokenAndAccessToken,
                &cancel,
            )
            .await
            .unwrap_err();
            assert!(error.is_cancelled());
        });
    }
}

//! OpenID Connect specific parameters.

use crate::config::InputLengthRestrictions;
use crate::error::ProtocolError;
use crate::params::{self, RequestParameters};
use crate::syntax;
use crate::types::ResponseType;

const NAME: &str = params::authorize::NONCE;

/// Validates `nonce`.
///
/// The hybrid flow (`code id_token`) returns an ID token from the authorize
/// endpoint and therefore requires a nonce; elsewhere it is optional.
///
/// # Errors
///
/// Returns `invalid_request` if the nonce is required but absent, repeated,
/// too long or not VSCHAR.
pub fn validate_nonce(
    params: &RequestParameters,
    response_type: ResponseType,
    limits: &InputLengthRestrictions,
) -> Result<Option<String>, ProtocolError> {
    let Some(nonce) = params
        .single(NAME, limits.nonce)
        .map_err(|e| e.into_protocol_error(NAME))?
    else {
        if response_type == ResponseType::CodeIdToken {
            return Err(params::missing(NAME));
        }
        return Ok(None);
    };

    if !syntax::is_vschar(nonce) {
        return Err(params::invalid_syntax(NAME));
    }
    Ok(Some(nonce.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_required_for_hybrid_only() {
        let limits = InputLengthRestrictions::default();
        let none = RequestParameters::new();

        let error = validate_nonce(&none, ResponseType::CodeIdToken, &limits).unwrap_err();
        assert_eq!(error.error_description.as_deref(), Some("\"nonce\" is missing"));

        let empty = RequestParameters::new().with("nonce", "");
        assert!(validate_nonce(&empty, ResponseType::CodeIdToken, &limits).is_err());

        assert_eq!(validate_nonce(&none, ResponseType::Code, &limits).unwrap(), None);
        assert_eq!(validate_nonce(&none, ResponseType::IdToken, &limits).unwrap(), None);
    }

    #[test]
    fn test_nonce_value_checks() {
        let limits = InputLengthRestrictions::default();
        let ok = RequestParameters::new().with("nonce", "n-0S6_WzA2Mj");
        assert_eq!(
            validate_nonce(&ok, ResponseType::CodeIdToken, &limits)
                .unwrap()
                .as_deref(),
            Some("n-0S6_WzA2Mj")
        );

        let long = RequestParameters::new().with("nonce", "n".repeat(301));
        assert_eq!(
            validate_nonce(&long, ResponseType::Code, &limits)
                .unwrap_err()
                .error_description
                .as_deref(),
            Some("\"nonce\" is too long")
        );

        let bad = RequestParameters::new().with("nonce", "tab\there");
        assert!(validate_nonce(&bad, ResponseType::Code, &limits).is_err());
    }
}

//! `state` parameter.

use crate::config::InputLengthRestrictions;
use crate::error::ProtocolError;
use crate::params::{self, RequestParameters};
use crate::syntax;

const NAME: &str = params::authorize::STATE;

/// Validates the optional opaque `state` value.
///
/// # Errors
///
/// Returns `invalid_request` if `state` is repeated, too long or not VSCHAR.
pub fn validate_state(
    params: &RequestParameters,
    limits: &InputLengthRestrictions,
) -> Result<Option<String>, ProtocolError> {
    let Some(state) = params
        .single(NAME, limits.state)
        .map_err(|e| e.into_protocol_error(NAME))?
    else {
        return Ok(None);
    };

    if !syntax::is_vschar(state) {
        return Err(params::invalid_syntax(NAME));
    }
    Ok(Some(state.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state() {
        let limits = InputLengthRestrictions::default();
        let ok = RequestParameters::new().with("state", "af0ifjsldkj");
        assert_eq!(validate_state(&ok, &limits).unwrap().as_deref(), Some("af0ifjsldkj"));

        assert_eq!(validate_state(&RequestParameters::new(), &limits).unwrap(), None);
        assert_eq!(
            validate_state(&RequestParameters::new().with("state", ""), &limits).unwrap(),
            None
        );

        let bad = RequestParameters::new().with("state", "line\nbreak");
        assert_eq!(
            validate_state(&bad, &limits).unwrap_err().error_description.as_deref(),
            Some("Invalid \"state\" syntax")
        );

        let long = RequestParameters::new().with("state", "s".repeat(301));
        assert_eq!(
            validate_state(&long, &limits).unwrap_err().error_description.as_deref(),
            Some("\"state\" is too long")
        );
    }
}

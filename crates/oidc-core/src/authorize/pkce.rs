//! `code_challenge` and `code_challenge_method` parameters.

use crate::config::CoreConfig;
use crate::error::ProtocolError;
use crate::params::{self, RequestParameters};
use crate::pkce::CodeChallengeMethod;
use crate::syntax;
use crate::types::ResponseType;

const CHALLENGE: &str = params::authorize::CODE_CHALLENGE;
const METHOD: &str = params::authorize::CODE_CHALLENGE_METHOD;

/// Validated PKCE challenge, persisted with the authorization code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChallenge {
    pub challenge: String,
    pub method: CodeChallengeMethod,
}

/// Validates the PKCE challenge of a request that returns a code.
///
/// Returns `Ok(None)` for response types without a code. The method
/// defaults to `plain` when omitted.
///
/// # Errors
///
/// Returns `invalid_request` if the challenge is missing, repeated, has the
/// wrong length or characters, or the method is unknown or disabled.
pub fn validate_code_challenge(
    params: &RequestParameters,
    response_type: ResponseType,
    config: &CoreConfig,
) -> Result<Option<CodeChallenge>, ProtocolError> {
    if !response_type.includes_code() {
        return Ok(None);
    }
    let limits = &config.input_length_restrictions;

    let challenge = params
        .single(CHALLENGE, limits.code_challenge_max_length)
        .map_err(|e| e.into_protocol_error(CHALLENGE))?
        .ok_or_else(|| params::missing(CHALLENGE))?;
    if challenge.len() < limits.code_challenge_min_length {
        return Err(ProtocolError::invalid_request(format!(
            "\"{CHALLENGE}\" is too short"
        )));
    }
    if !syntax::is_unreserved(challenge) {
        return Err(params::invalid_syntax(CHALLENGE));
    }

    let method = match params
        .single(METHOD, limits.code_challenge_method)
        .map_err(|e| e.into_protocol_error(METHOD))?
    {
        None => CodeChallengeMethod::Plain,
        Some(raw) => CodeChallengeMethod::parse(raw).map_err(|_| unsupported_method())?,
    };
    if !config.code_challenge_methods.contains(&method) {
        return Err(unsupported_method());
    }

    Ok(Some(CodeChallenge {
        challenge: challenge.to_string(),
        method,
    }))
}

fn unsupported_method() -> ProtocolError {
    ProtocolError::invalid_request(format!("Unsupported \"{METHOD}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHALLENGE_VALUE: &str = "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM";

    #[test]
    fn test_s256_challenge() {
        let params = RequestParameters::new()
            .with("code_challenge", CHALLENGE_VALUE)
            .with("code_challenge_method", "S256");
        let challenge = validate_code_challenge(&params, ResponseType::Code, &CoreConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(challenge.method, CodeChallengeMethod::S256);
        assert_eq!(challenge.challenge, CHALLENGE_VALUE);
    }

    #[test]
    fn test_method_defaults_to_plain() {
        let params = RequestParameters::new().with("code_challenge", CHALLENGE_VALUE);
        let challenge = validate_code_challenge(&params, ResponseType::Code, &CoreConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(challenge.method, CodeChallengeMethod::Plain);
    }

    #[test]
    fn test_plain_can_be_disabled() {
        let config = CoreConfig {
            code_challenge_methods: vec![CodeChallengeMethod::S256],
            ..Default::default()
        };
        let params = RequestParameters::new().with("code_challenge", CHALLENGE_VALUE);
        let error = validate_code_challenge(&params, ResponseType::Code, &config).unwrap_err();
        assert_eq!(
            error.error_description.as_deref(),
            Some("Unsupported \"code_challenge_method\"")
        );
    }

    #[test]
    fn test_not_required_without_code() {
        assert_eq!(
            validate_code_challenge(
                &RequestParameters::new(),
                ResponseType::IdToken,
                &CoreConfig::default()
            )
            .unwrap(),
            None
        );
    }

    #[test]
    fn test_challenge_errors() {
        let config = CoreConfig::default();
        let missing =
            validate_code_challenge(&RequestParameters::new(), ResponseType::Code, &config)
                .unwrap_err();
        assert_eq!(
            missing.error_description.as_deref(),
            Some("\"code_challenge\" is missing")
        );

        let short = RequestParameters::new().with("code_challenge", "abc");
        assert!(validate_code_challenge(&short, ResponseType::Code, &config).is_err());

        let bad = RequestParameters::new().with("code_challenge", "+".repeat(43));
        assert_eq!(
            validate_code_challenge(&bad, ResponseType::Code, &config)
                .unwrap_err()
                .error_description
                .as_deref(),
            Some("Invalid \"code_challenge\" syntax")
        );

        let unknown = RequestParameters::new()
            .with("code_challenge", CHALLENGE_VALUE)
            .with("code_challenge_method", "S512");
        assert!(validate_code_challenge(&unknown, ResponseType::Code, &config).is_err());
    }
}

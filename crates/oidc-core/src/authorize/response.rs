//! `response_type` and `response_mode` parameters.

use crate::config::{CoreConfig, InputLengthRestrictions};
use crate::error::ProtocolError;
use crate::params::{self, RequestParameters};
use crate::types::{Client, GrantType, ResponseMode, ResponseType, ResponseTypeToken};

const RESPONSE_TYPE: &str = params::authorize::RESPONSE_TYPE;
const RESPONSE_MODE: &str = params::authorize::RESPONSE_MODE;

/// Validates `response_type` against the client's capabilities.
///
/// `code` survives only for clients registered for the `code` response type
/// and the `authorization_code` grant; `id_token` needs the `id_token`
/// response type and the `implicit` grant. Unknown tokens never survive.
///
/// # Errors
///
/// - `invalid_request` if the value is missing, repeated, too long, has a
///   duplicate token, or contains a token the client may not use next to one
///   it may use
/// - `unsupported_response_type` if no token survives
pub fn validate_response_type(
    params: &RequestParameters,
    client: &Client,
    limits: &InputLengthRestrictions,
) -> Result<ResponseType, ProtocolError> {
    let raw = params
        .single(RESPONSE_TYPE, limits.response_type)
        .map_err(|e| e.into_protocol_error(RESPONSE_TYPE))?
        .ok_or_else(|| params::missing(RESPONSE_TYPE))?;

    let invalid = || ProtocolError::invalid_request(format!("Invalid \"{RESPONSE_TYPE}\""));

    let mut seen: Vec<&str> = Vec::new();
    let mut code = false;
    let mut id_token = false;
    let mut dropped = false;
    for token in raw.split(' ') {
        if seen.contains(&token) {
            return Err(invalid());
        }
        seen.push(token);

        match ResponseTypeToken::parse(token) {
            Some(ResponseTypeToken::Code)
                if client.is_response_type_allowed(ResponseTypeToken::Code)
                    && client.is_grant_type_allowed(GrantType::AuthorizationCode) =>
            {
                code = true;
            }
            Some(ResponseTypeToken::IdToken)
                if client.is_response_type_allowed(ResponseTypeToken::IdToken)
                    && client.is_grant_type_allowed(GrantType::Implicit) =>
            {
                id_token = true;
            }
            _ => dropped = true,
        }
    }

    let Some(response_type) = ResponseType::from_flags(code, id_token) else {
        tracing::debug!(client_id = %client.client_id, response_type = %raw, "Unsupported response type");
        return Err(ProtocolError::unsupported_response_type(format!(
            "Unsupported \"{RESPONSE_TYPE}\""
        )));
    };
    if dropped {
        tracing::debug!(client_id = %client.client_id, response_type = %raw, "Response type partially unauthorized");
        return Err(invalid());
    }
    Ok(response_type)
}

/// Validates `response_mode`, inferring the default from the response type.
///
/// # Errors
///
/// Returns `invalid_request` if the value is repeated, too long, unknown, or
/// not enabled in the configuration.
pub fn validate_response_mode(
    params: &RequestParameters,
    response_type: ResponseType,
    config: &CoreConfig,
) -> Result<ResponseMode, ProtocolError> {
    let Some(raw) = params
        .single(RESPONSE_MODE, config.input_length_restrictions.response_mode)
        .map_err(|e| e.into_protocol_error(RESPONSE_MODE))?
    else {
        return Ok(response_type.default_response_mode());
    };

    match ResponseMode::parse(raw) {
        Some(mode) if config.response_modes.contains(&mode) => Ok(mode),
        _ => Err(ProtocolError::invalid_request(format!(
            "Unsupported \"{RESPONSE_MODE}\""
        ))),
    }
}

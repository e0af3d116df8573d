//! Raw request parameters.
//!
//! Authorize and token requests arrive as `application/x-www-form-urlencoded`
//! pairs (query string or body). A parameter may legally appear more than
//! once on the wire, so values are kept as a list per name and the
//! single-value rule is applied when a validator reads them.

use indexmap::IndexMap;

use crate::error::ProtocolError;

/// Authorize endpoint parameter names.
pub mod authorize {
    pub const CLIENT_ID: &str = "client_id";
    pub const RESPONSE_TYPE: &str = "response_type";
    pub const RESPONSE_MODE: &str = "response_mode";
    pub const STATE: &str = "state";
    pub const REDIRECT_URI: &str = "redirect_uri";
    pub const SCOPE: &str = "scope";
    pub const NONCE: &str = "nonce";
    pub const CODE_CHALLENGE: &str = "code_challenge";
    pub const CODE_CHALLENGE_METHOD: &str = "code_challenge_method";
}

/// Token endpoint parameter names.
pub mod token {
    pub const GRANT_TYPE: &str = "grant_type";
    pub const CODE: &str = "code";
    pub const REDIRECT_URI: &str = "redirect_uri";
    pub const CODE_VERIFIER: &str = "code_verifier";
    pub const SCOPE: &str = "scope";
    pub const REFRESH_TOKEN: &str = "refresh_token";
}

/// Ordered multi-valued parameter map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    values: IndexMap<String, Vec<String>>,
}

impl RequestParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a query string or form body.
    #[must_use]
    pub fn from_form(encoded: &str) -> Self {
        let encoded = encoded.strip_prefix('?').unwrap_or(encoded);
        url::form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect()
    }

    /// Appends a value for `name`.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// Builder-style [`append`](Self::append).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// Removes `name`, returning its values.
    pub fn remove(&mut self, name: &str) -> Vec<String> {
        self.values.shift_remove(name).unwrap_or_default()
    }

    /// Returns every value supplied for `name`.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if no value (not even an empty one) was supplied.
    #[must_use]
    pub fn is_absent(&self, name: &str) -> bool {
        self.values(name).is_empty()
    }

    /// Reads a single-valued parameter.
    ///
    /// Returns `Ok(None)` when the parameter is absent or its only value is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Multiple`] if more than one value was
    /// supplied and [`ParameterError::TooLong`] if the value exceeds
    /// `max_length` bytes.
    pub fn single(&self, name: &str, max_length: usize) -> Result<Option<&str>, ParameterError> {
        match self.values(name) {
            [] => Ok(None),
            [value] if value.is_empty() => Ok(None),
            [value] if value.len() > max_length => Err(ParameterError::TooLong),
            [value] => Ok(Some(value.as_str())),
            _ => Err(ParameterError::Multiple),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.append(name, value);
        }
        params
    }
}

/// Violations of the single-value rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// More than one value was supplied.
    Multiple,
    /// The value is longer than allowed.
    TooLong,
}

impl ParameterError {
    /// Converts the violation into an `invalid_request` error for `name`.
    #[must_use]
    pub fn into_protocol_error(self, name: &str) -> ProtocolError {
        match self {
            Self::Multiple => multiple_values(name),
            Self::TooLong => too_long(name),
        }
    }
}

// -----------------------------------------------------------------------------
// Standard descriptions
// -----------------------------------------------------------------------------

pub(crate) fn missing(name: &str) -> ProtocolError {
    ProtocolError::invalid_request(format!("\"{name}\" is missing"))
}

pub(crate) fn multiple_values(name: &str) -> ProtocolError {
    ProtocolError::invalid_request(format!(
        "Multiple \"{name}\" values are present, but only one is allowed"
    ))
}

pub(crate) fn too_long(name: &str) -> ProtocolError {
    ProtocolError::invalid_request(format!("\"{name}\" is too long"))
}

pub(crate) fn invalid_syntax(name: &str) -> ProtocolError {
    ProtocolError::invalid_request(format!("Invalid \"{name}\" syntax"))
}

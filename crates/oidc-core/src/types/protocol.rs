//! Authorize endpoint protocol values.

use serde::{Deserialize, Serialize};

/// A single `response_type` token a client can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseTypeToken {
    /// `code`
    Code,
    /// `id_token`
    IdToken,
}

impl ResponseTypeToken {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::IdToken => "id_token",
        }
    }

    /// Parses a single token.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "code" => Some(Self::Code),
            "id_token" => Some(Self::IdToken),
            _ => None,
        }
    }
}

/// Resolved `response_type` of an authorize request.
///
/// Only the combinations this server issues are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// `code` (authorization code flow).
    Code,
    /// `id_token` (implicit flow, ID token only).
    IdToken,
    /// `code id_token` (hybrid flow).
    CodeIdToken,
}

impl ResponseType {
    /// Builds the response type from the tokens that survived validation.
    #[must_use]
    pub fn from_flags(code: bool, id_token: bool) -> Option<Self> {
        match (code, id_token) {
            (true, false) => Some(Self::Code),
            (false, true) => Some(Self::IdToken),
            (true, true) => Some(Self::CodeIdToken),
            (false, false) => None,
        }
    }

    /// Returns `true` if an authorization code is returned.
    #[must_use]
    pub fn includes_code(&self) -> bool {
        matches!(self, Self::Code | Self::CodeIdToken)
    }

    /// Returns `true` if an ID token is returned from the authorize endpoint.
    #[must_use]
    pub fn includes_id_token(&self) -> bool {
        matches!(self, Self::IdToken | Self::CodeIdToken)
    }

    /// Response mode used when the request does not specify one.
    #[must_use]
    pub fn default_response_mode(&self) -> ResponseMode {
        match self {
            Self::Code => ResponseMode::Query,
            Self::IdToken | Self::CodeIdToken => ResponseMode::Fragment,
        }
    }

    /// Returns the space-delimited wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::IdToken => "id_token",
            Self::CodeIdToken => "code id_token",
        }
    }
}

impl std::fmt::Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How authorize endpoint results are returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Parameters in the redirect URI query string.
    Query,
    /// Parameters in the redirect URI fragment.
    Fragment,
    /// Parameters in an auto-submitted HTML form.
    FormPost,
}

impl ResponseMode {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Fragment => "fragment",
            Self::FormPost => "form_post",
        }
    }

    /// Parses a `response_mode` value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "query" => Some(Self::Query),
            "fragment" => Some(Self::Fragment),
            "form_post" => Some(Self::FormPost),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_response_modes() {
        assert_eq!(ResponseType::Code.default_response_mode(), ResponseMode::Query);
        assert_eq!(
            ResponseType::IdToken.default_response_mode(),
            ResponseMode::Fragment
        );
        assert_eq!(
            ResponseType::CodeIdToken.default_response_mode(),
            ResponseMode::Fragment
        );
    }

    #[test]
    fn test_from_flags() {
        assert_eq!(ResponseType::from_flags(true, true), Some(ResponseType::CodeIdToken));
        assert_eq!(ResponseType::from_flags(false, false), None);
        assert!(ResponseType::CodeIdToken.includes_code());
        assert!(!ResponseType::Code.includes_id_token());
    }

    #[test]
    fn test_response_mode_parse() {
        assert_eq!(ResponseMode::parse("form_post"), Some(ResponseMode::FormPost));
        assert_eq!(ResponseMode::parse("FORM_POST"), None);
        assert_eq!(ResponseMode::parse("web_message"), None);
    }

    #[test]
    fn test_response_mode_serde() {
        let json = serde_json::to_string(&ResponseMode::FormPost).unwrap();
        assert_eq!(json, "\"form_post\"");
        let token: ResponseTypeToken = serde_json::from_str("\"id_token\"").unwrap();
        assert_eq!(token, ResponseTypeToken::IdToken);
    }
}

//! # oidc-core
//!
//! Protocol core of an OAuth 2.1 / OpenID Connect authorization server.
//!
//! This crate provides:
//! - Authorize endpoint request validation
//! - Token endpoint validation for the `authorization_code`,
//!   `client_credentials` and `refresh_token` grants
//! - PKCE (RFC 7636) challenge and verifier checks
//! - Successful token response generation
//!
//! ## Overview
//!
//! Transport, client authentication, token encoding and persistence are
//! left to the host. The core talks to them through the async traits in
//! [`storage`], [`services`] and [`token::issuance`], and returns either a
//! validated request or a [`ProtocolError`] that is safe to show to the
//! client.
//!
//! ## Modules
//!
//! - [`authorize`] - Authorize request validators
//! - [`config`] - Input length limits and supported modes
//! - [`error`] - Protocol and core errors
//! - [`params`] - Multi-valued request parameters
//! - [`pkce`] - Proof Key for Code Exchange
//! - [`scope`] - Scope parsing and resolution
//! - [`services`] - Profile and resource collaborators
//! - [`storage`] - Storage traits for clients, codes, tokens and consents
//! - [`syntax`] - RFC 6749 character classes and redirect URI parsing
//! - [`token`] - Token request validators and response generator
//! - [`types`] - Domain types

pub mod authorize;
pub mod config;
pub mod error;
pub mod params;
pub mod pkce;
pub mod scope;
pub mod services;
pub mod storage;
pub mod syntax;
pub mod token;
pub mod types;

pub use authorize::{
    AuthorizeRequestError, AuthorizeRequestValidator, RequiredParameters,
    RequiredParametersValidator, ValidatedAuthorizeRequest,
};
pub use config::{ConfigError, ConfigHandle, CoreConfig, InputLengthRestrictions};
pub use error::{CoreError, ErrorCategory, ErrorCode, ProtocolError};
pub use params::RequestParameters;
pub use pkce::{CodeChallengeMethod, PkceError};
pub use services::{ProfileService, ResourceService, ScopeCatalog};
pub use storage::{AuthorizationCodeStorage, ClientStorage, ConsentStorage, RefreshTokenStorage};
pub use token::{
    SuccessfulTokenResponse, TokenRequestValidator, TokenResponseGenerator, ValidTokenRequest,
};
pub use types::{Client, GrantType, ResponseMode, ResponseType, ValidResources};

/// Type alias for core results.
pub type CoreResult<T> = Result<T, CoreError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use oidc_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::CoreResult;
    pub use crate::authorize::{
        AuthorizeRequestError, AuthorizeRequestValidator, RequiredParameters,
        ValidatedAuthorizeRequest,
    };
    pub use crate::config::{ConfigError, ConfigHandle, CoreConfig, InputLengthRestrictions};
    pub use crate::error::{CoreError, ErrorCategory, ErrorCode, ProtocolError};
    pub use crate::params::RequestParameters;
    pub use crate::pkce::CodeChallengeMethod;
    pub use crate::services::{ProfileService, ResourceService, ScopeCatalog};
    pub use crate::storage::{
        AuthorizationCodeStorage, ClientStorage, ConsentStorage, RefreshTokenStorage,
    };
    pub use crate::token::{
        AccessTokenIssuer, IdTokenIssuer, IssuedToken, RefreshTokenIssuer,
        SuccessfulTokenResponse, TokenRequestValidator, TokenResponseGenerator, ValidTokenRequest,
    };
    pub use crate::types::{
        AuthorizationCode, Client, EssentialClaims, GrantType, GrantedConsent, RefreshToken,
        ResponseMode, ResponseType, ValidResources,
    };
}

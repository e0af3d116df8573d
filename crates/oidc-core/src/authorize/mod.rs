//! Authorize endpoint request validation.
//!
//! Parameter validators are plain functions, one per parameter. They are
//! composed by [`RequiredParametersValidator`] (everything needed to trust
//! the redirect URI) and [`AuthorizeRequestValidator`] (the whole request).

mod client_id;
mod oidc;
mod pkce;
mod redirect_uri;
mod required;
mod response;
mod scope;
mod state;
mod validator;

pub use client_id::validate_client_id;
pub use oidc::validate_nonce;
pub use pkce::{CodeChallenge, validate_code_challenge};
pub use redirect_uri::validate_redirect_uri;
pub use required::{RequiredParameters, RequiredParametersValidator};
pub use response::{validate_response_mode, validate_response_type};
pub use scope::validate_scope;
pub use state::validate_state;
pub use validator::{AuthorizeRequestError, AuthorizeRequestValidator, ValidatedAuthorizeRequest};

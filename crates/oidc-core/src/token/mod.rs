//! Token endpoint request validation and response generation.
//!
//! Client authentication happens before this module is reached; every
//! validator here receives the already authenticated [`Client`].
//!
//! [`Client`]: crate::types::Client

mod authorization_code;
mod client_credentials;
pub mod issuance;
mod refresh_token;
mod request;
mod response;
mod scope;

pub use authorization_code::{
    AuthorizationCodeGrantValidator, ValidAuthorizationCodeRequest, validate_code,
};
pub use client_credentials::{ClientCredentialsGrantValidator, ValidClientCredentialsRequest};
pub use issuance::{
    AccessTokenIssuer, AccessTokenRequest, IdTokenIssuer, IdTokenRequest, IssuedToken,
    RefreshTokenIssuer, RefreshTokenRequest,
};
pub use refresh_token::{RefreshTokenGrantValidator, ValidRefreshTokenRequest, validate_refresh_token};
pub use request::{TokenRequestValidator, ValidTokenRequest};
pub use response::{SuccessfulTokenResponse, TokenResponseGenerator};
pub use scope::{validate_client_scope, validate_granted_scope};

use crate::error::ProtocolError;

pub(crate) fn unauthorized_grant() -> ProtocolError {
    ProtocolError::unauthorized_client(
        "The authenticated client is not authorized to use this authorization grant type",
    )
}

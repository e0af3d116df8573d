//! Token issuance collaborators.
//!
//! Token encoding (JWT or reference handles), signing and persistence of
//! access tokens live behind these traits. The core only asks for a token
//! and receives its handle, lifetime and issuance time.

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tokio_util::sync::CancellationToken;

use crate::CoreResult;
use crate::types::{
    Client, EssentialClaims, GrantType, RefreshToken, ResourceOwnerProfile, ValidResources,
};

/// A token created by an issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Value handed to the client.
    pub handle: String,
    pub lifetime: Duration,
    pub issued_at: OffsetDateTime,
}

/// Inputs for access token creation.
#[derive(Debug, Clone, Copy)]
pub struct AccessTokenRequest<'a> {
    pub client: &'a Client,
    pub issuer: &'a str,
    pub grant_type: GrantType,
    /// `None` for `client_credentials`.
    pub profile: Option<&'a ResourceOwnerProfile>,
    pub resources: &'a ValidResources,
    pub issued_at: OffsetDateTime,
}

/// Inputs for ID token creation.
#[derive(Debug, Clone, Copy)]
pub struct IdTokenRequest<'a> {
    pub client: &'a Client,
    pub issuer: &'a str,
    pub profile: &'a ResourceOwnerProfile,
    pub essential_claims: &'a EssentialClaims,
    pub resources: &'a ValidResources,
    /// Access token the ID token is bound to (`at_hash`).
    pub access_token_handle: &'a str,
    pub nonce: Option<&'a str>,
    pub issued_at: OffsetDateTime,
}

/// Inputs for refresh token creation.
#[derive(Debug, Clone, Copy)]
pub struct RefreshTokenRequest<'a> {
    pub client: &'a Client,
    pub issuer: &'a str,
    pub essential_claims: &'a EssentialClaims,
    pub resources: &'a ValidResources,
    pub access_token: &'a IssuedToken,
    /// Token being rotated, for the `refresh_token` grant.
    pub previous: Option<&'a RefreshToken>,
    pub issued_at: OffsetDateTime,
}

/// Creates access tokens.
#[async_trait]
pub trait AccessTokenIssuer: Send + Sync {
    /// # Errors
    ///
    /// Returns an error describing why the token could not be created.
    async fn create_access_token(
        &self,
        request: AccessTokenRequest<'_>,
        cancel: &CancellationToken,
    ) -> CoreResult<IssuedToken>;
}

/// Creates ID tokens.
#[async_trait]
pub trait IdTokenIssuer: Send + Sync {
    /// # Errors
    ///
    /// Returns an error describing why the token could not be created.
    async fn create_id_token(
        &self,
        request: IdTokenRequest<'_>,
        cancel: &CancellationToken,
    ) -> CoreResult<IssuedToken>;
}

/// Creates refresh tokens.
#[async_trait]
pub trait RefreshTokenIssuer: Send + Sync {
    /// # Errors
    ///
    /// Returns an error describing why the token could not be created.
    async fn create_refresh_token(
        &self,
        request: RefreshTokenRequest<'_>,
        cancel: &CancellationToken,
    ) -> CoreResult<IssuedToken>;
}

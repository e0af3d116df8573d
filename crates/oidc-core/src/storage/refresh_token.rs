//! Refresh token storage trait.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::CoreResult;
use crate::types::RefreshToken;

/// Persistence of refresh tokens.
#[async_trait]
pub trait RefreshTokenStorage: Send + Sync {
    /// Store a new refresh token and return its opaque handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn create(&self, token: RefreshToken, cancel: &CancellationToken)
    -> CoreResult<String>;

    /// Look up a refresh token by handle and remove it atomically.
    ///
    /// Returns `None` if the token is unknown, expired, revoked or already
    /// consumed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn consume(
        &self,
        handle: &str,
        cancel: &CancellationToken,
    ) -> CoreResult<Option<RefreshToken>>;
}

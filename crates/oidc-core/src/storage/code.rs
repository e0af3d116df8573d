//! Authorization code storage trait.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::CoreResult;
use crate::types::AuthorizationCode;

/// Persistence of authorization codes.
#[async_trait]
pub trait AuthorizationCodeStorage: Send + Sync {
    /// Store a new authorization code and return its opaque handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn create(
        &self,
        code: AuthorizationCode,
        cancel: &CancellationToken,
    ) -> CoreResult<String>;

    /// Look up a code by handle and remove it atomically.
    ///
    /// Returns `None` if the code is unknown, expired or already consumed.
    /// A second call with the same handle must never return the code again.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn consume(
        &self,
        handle: &str,
        cancel: &CancellationToken,
    ) -> CoreResult<Option<AuthorizationCode>>;
}

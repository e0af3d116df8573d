//! Client storage trait.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::CoreResult;
use crate::types::Client;

/// Read access to registered clients.
///
/// # Example
///
/// ```ignore
/// use oidc_core::storage::ClientStorage;
///
/// async fn example(storage: &dyn ClientStorage, cancel: &CancellationToken) {
///     if let Some(client) = storage.find_enabled("my-app", cancel).await? {
///         println!("Found client: {}", client.client_id);
///     }
/// }
/// ```
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Find an enabled client by its `client_id`.
    ///
    /// Returns `None` if the client does not exist or is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_enabled(
        &self,
        client_id: &str,
        cancel: &CancellationToken,
    ) -> CoreResult<Option<Client>>;
}

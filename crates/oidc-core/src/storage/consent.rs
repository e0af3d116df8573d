//! Consent storage trait.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::CoreResult;
use crate::types::{Client, GrantedConsent};

/// Read access to consent granted by resource owners.
#[async_trait]
pub trait ConsentStorage: Send + Sync {
    /// Find the consent a subject has granted to a client.
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Resource owner subject identifier
    /// * `client` - Client the consent was granted to
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find(
        &self,
        subject_id: &str,
        client: &Client,
        cancel: &CancellationToken,
    ) -> CoreResult<Option<GrantedConsent>>;
}

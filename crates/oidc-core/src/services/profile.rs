//! Resource-owner profile lookup.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::CoreResult;
use crate::types::{EssentialClaims, ProfileResult, ValidResources};

/// Loads the profile of the resource owner behind a grant.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Fetch the profile for the given essential claims, releasing the claims
    /// covered by `granted_resources`.
    ///
    /// An account that still exists but has been disabled is reported with
    /// `is_active = false`, not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    async fn get_profile(
        &self,
        essential_claims: &EssentialClaims,
        granted_resources: &ValidResources,
        cancel: &CancellationToken,
    ) -> CoreResult<ProfileResult>;
}

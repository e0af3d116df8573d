//! Collaborators consulted while validating requests.

mod profile;
mod resources;

pub use profile::ProfileService;
pub use resources::{
    ResourceService, ResourceValidationError, ScopeCatalog, ScopeDefinition, ScopeTokenType,
};

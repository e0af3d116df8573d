//! Domain types shared by the validators.

pub mod client;
pub mod grant;
pub mod protocol;
pub mod resources;

pub use client::{Client, ClientValidationError, GrantType};
pub use grant::{
    AuthorizationCode, EssentialClaims, GrantedConsent, RefreshToken, ResourceOwnerIdentifiers,
};
pub use protocol::{ResponseMode, ResponseType, ResponseTypeToken};
pub use resources::{
    OFFLINE_ACCESS, OPENID, ProfileResult, ResourceOwnerProfile, TokenTypeFilter, ValidResources,
};

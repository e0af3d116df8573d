//! Storage traits for protocol data.
//!
//! The core never persists anything itself. Each trait is implemented by a
//! storage backend, which owns atomicity (for example one-time consumption
//! of authorization codes) and any caching.
//!
//! Every method receives the request's cancellation token so that long
//! running I/O can be abandoned early.

mod client;
mod code;
mod consent;
mod refresh_token;

pub use client::ClientStorage;
pub use code::AuthorizationCodeStorage;
pub use consent::ConsentStorage;
pub use refresh_token::RefreshTokenStorage;

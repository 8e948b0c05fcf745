//! # progressly-auth
//!
//! Identity and profile plumbing for Progressly.
//!
//! Provides the identity-provider seam ([`IdentityProvider`]), bearer-token
//! claims reading ([`claims::ClaimsReader`]), the backend profile source
//! ([`ProfileApi`] / [`profile::HttpProfileApi`]), the local last-known-mode
//! cache ([`mode_cache::LocalModeCache`]), and the one-time mode bootstrap
//! calls ([`bootstrap`]).
//!
//! Nothing in this crate touches session state directly; reconciliation and
//! publishing live in `progressly-session`.

pub mod bootstrap;
pub mod claims;
pub mod error;
pub mod mode_cache;
pub mod profile;
pub mod provider;

pub use error::AuthError;
pub use profile::{OfficeMember, ProfileApi};
pub use provider::IdentityProvider;

//! # progressly-core
//!
//! Shared identity and session types for Progressly.
//!
//! Contains only data types — no network calls, no provider SDK logic.
//! Produced/consumed across `progressly-auth` and `progressly-session`.

pub mod enums;
pub mod identity;
pub mod session;

pub use enums::{Mode, Role};
pub use identity::{AuthEvent, ClaimsSnapshot, Principal, ProfileRecord};
pub use session::SessionState;

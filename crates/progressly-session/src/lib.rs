//! # progressly-session
//!
//! The session core of Progressly: merges three independently-stale
//! sources of truth — bearer-token claims, the backend profile record, and
//! the local mode cache — into one [`SessionState`](progressly_core::SessionState),
//! publishes it reactively, and gates navigation on it.
//!
//! Flow: auth event → claims read + profile fetch (concurrent) →
//! [`reconcile`] → [`SessionStore`] publish → [`guard`] decisions on every
//! navigation.

pub mod guard;
pub mod reconcile;
pub mod store;

pub use guard::{AccessGuard, GuardDecision, RoleDecision, RoleGate, RouteRequest};
pub use store::SessionStore;

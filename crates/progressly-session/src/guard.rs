//! Navigation guards.
//!
//! [`AccessGuard`] is the coarse state machine evaluated on every
//! navigation and every session-state change; it holds no history and is
//! re-entered from scratch each time. [`RoleGate`] layers a per-route role
//! allow-list on top, after the guard has authorized the subtree.

use std::collections::HashSet;

use progressly_core::{Role, SessionState};

/// A requested navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub path: String,
    /// Whether the target requires a selected mode (the `/app` subtree).
    pub mode_gated: bool,
}

impl RouteRequest {
    #[must_use]
    pub fn mode_gated(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode_gated: true,
        }
    }

    #[must_use]
    pub fn open(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode_gated: false,
        }
    }
}

/// Outcome of one guard evaluation.
///
/// Maps 1:1 onto the guard states: `Loading`, `RedirectToSignIn`
/// (anonymous), `RedirectToModeSelect` (needs mode), `Render` (authorized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Reconciliation in flight: render a neutral placeholder, make no
    /// redirect decision yet (prevents a redirect flicker to sign-in).
    Loading,
    /// No principal: redirect to sign-in, preserving the requested path
    /// for post-login return.
    RedirectToSignIn { return_to: String },
    /// Signed in but no mode selected on a mode-gated path.
    RedirectToModeSelect,
    Render,
}

pub struct AccessGuard;

impl AccessGuard {
    /// Decide what to do with a navigation request under the current
    /// session state. Pure; re-evaluated on every call.
    #[must_use]
    pub fn evaluate(state: &SessionState, request: &RouteRequest) -> GuardDecision {
        if state.loading {
            return GuardDecision::Loading;
        }
        if !state.is_signed_in() {
            return GuardDecision::RedirectToSignIn {
                return_to: request.path.clone(),
            };
        }
        if request.mode_gated && state.mode.is_none() {
            return GuardDecision::RedirectToModeSelect;
        }
        GuardDecision::Render
    }
}

/// Outcome of a role gate evaluation.
///
/// An unauthorized role gets an explicit redirect rather than silently
/// hidden content, so the signal is distinct from "not logged in".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleDecision {
    Render,
    RedirectToUnauthorized,
}

/// Per-route role allow-list. Empty means "no restriction".
#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: HashSet<Role>,
}

impl RoleGate {
    #[must_use]
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Unrestricted gate.
    #[must_use]
    pub fn any() -> Self {
        Self::new([])
    }

    #[must_use]
    pub fn allow(&self, state: &SessionState) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&state.role)
    }

    /// Layered after [`AccessGuard::evaluate`] returns
    /// [`GuardDecision::Render`].
    #[must_use]
    pub fn decide(&self, state: &SessionState) -> RoleDecision {
        if self.allow(state) {
            RoleDecision::Render
        } else {
            RoleDecision::RedirectToUnauthorized
        }
    }
}

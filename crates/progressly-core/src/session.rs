//! Reconciled session state published to the UI.

use serde::{Deserialize, Serialize};

use crate::enums::{Mode, Role};
use crate::identity::Principal;

/// The single client-owned view of "who am I, in which office, in which
/// mode" that guards and UI consume.
///
/// Mutated only by the identity reconciler in response to sign-in,
/// sign-out, or an explicit refresh. `role` is always concrete: when no
/// authoritative role is available it holds the fail-closed
/// [`Role::Employee`] default, never a privileged fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub principal: Option<Principal>,
    pub role: Role,
    pub office_id: Option<String>,
    pub mode: Option<Mode>,
    /// True while the initial (or a sign-in triggered) reconciliation is
    /// still in flight. Guards render a neutral placeholder in this state
    /// instead of deciding a redirect.
    pub loading: bool,
}

impl SessionState {
    /// Application-start state: nothing known yet, reconciliation pending.
    #[must_use]
    pub fn booting() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// State published while a just-signed-in principal is being reconciled.
    #[must_use]
    pub fn loading_for(principal: Principal) -> Self {
        Self {
            principal: Some(principal),
            loading: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.principal.is_some()
    }
}

impl Default for SessionState {
    /// The signed-out state: no principal, least-privileged role, no mode.
    fn default() -> Self {
        Self {
            principal: None,
            role: Role::Employee,
            office_id: None,
            mode: None,
            loading: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_signed_out_and_fail_closed() {
        let state = SessionState::default();
        assert_eq!(state.principal, None);
        assert_eq!(state.role, Role::Employee);
        assert_eq!(state.office_id, None);
        assert_eq!(state.mode, None);
        assert!(!state.loading);
    }

    #[test]
    fn booting_only_differs_by_loading() {
        let state = SessionState::booting();
        assert!(state.loading);
        assert_eq!(
            SessionState {
                loading: false,
                ..state
            },
            SessionState::default()
        );
    }

    #[test]
    fn loading_for_carries_principal() {
        let principal = Principal {
            id: "uid_1".into(),
            email: "a@b.c".into(),
        };
        let state = SessionState::loading_for(principal.clone());
        assert!(state.loading);
        assert_eq!(state.principal, Some(principal));
        assert_eq!(state.role, Role::Employee);
    }
}

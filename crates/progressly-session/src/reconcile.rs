//! Identity reconciliation.
//!
//! Precedence per field, highest wins, never mixed mid-field:
//! - `role`, `office_id`: profile record → claims → default
//!   (`Employee` / no office);
//! - `mode`: profile record → claims → local cache → unset.
//!
//! The profile record wins because it is the only source updated
//! synchronously by server-side mutations (join office, switch mode);
//! claims may trail by one token lifetime. Reconciliation never fails:
//! privilege fails closed, but a transient read of non-critical state must
//! not hard-fail the application.

use progressly_auth::claims::ClaimsReader;
use progressly_auth::mode_cache::LocalModeCache;
use progressly_auth::{AuthError, IdentityProvider, ProfileApi};
use progressly_core::{ClaimsSnapshot, Mode, Principal, ProfileRecord, Role, SessionState};

/// Merge the three sources into a [`SessionState`] for a signed-in
/// principal. Pure: no I/O, no panics.
#[must_use]
pub fn reconcile(
    principal: Principal,
    claims: Option<&ClaimsSnapshot>,
    profile: Option<&ProfileRecord>,
    cached_mode: Option<Mode>,
) -> SessionState {
    let role = profile
        .and_then(|p| p.role)
        .or_else(|| claims.and_then(|c| c.role))
        .unwrap_or(Role::Employee);

    let office_id = profile
        .and_then(|p| p.office_id.clone())
        .or_else(|| claims.and_then(|c| c.office_id.clone()));

    let mode = profile
        .and_then(|p| p.mode)
        .or_else(|| claims.and_then(|c| c.mode))
        .or(cached_mode);

    SessionState {
        principal: Some(principal),
        role,
        office_id,
        mode,
        loading: false,
    }
}

/// Run one full reconciliation: read claims and fetch the profile
/// concurrently, absorb their failures, and merge.
///
/// Upstream errors degrade rather than propagate: a failed claims read
/// falls back to the profile/cache, a failed profile fetch falls back to
/// claims (availability over freshness, logged for observability). The
/// one exception is losing the principal mid-flight, which yields the
/// signed-out default state.
pub async fn load_session(
    provider: &dyn IdentityProvider,
    profiles: &dyn ProfileApi,
    mode_cache: &LocalModeCache,
    claims_reader: ClaimsReader,
    profile_retry_limit: u32,
    force_token_refresh: bool,
) -> SessionState {
    let Some(principal) = provider.current_principal() else {
        return SessionState::default();
    };

    let (claims_result, profile_result) = tokio::join!(
        claims_reader.read(provider, force_token_refresh),
        fetch_profile_with_retry(profiles, &principal.id, profile_retry_limit),
    );

    let claims = match claims_result {
        Ok(snapshot) => Some(snapshot),
        Err(AuthError::NotAuthenticated) => return SessionState::default(),
        Err(error) => {
            tracing::warn!(%error, "claims read failed; reconciling without claims");
            None
        }
    };

    let profile = match profile_result {
        Ok(record) => record,
        Err(error) => {
            tracing::warn!(%error, "profile fetch failed; falling back to claims values");
            None
        }
    };

    reconcile(principal, claims.as_ref(), profile.as_ref(), mode_cache.load())
}

/// Bounded retry around the profile fetch. Only transport errors are
/// retried; `ProfileUnauthorized` and API errors surface immediately.
async fn fetch_profile_with_retry(
    profiles: &dyn ProfileApi,
    principal_id: &str,
    retry_limit: u32,
) -> Result<Option<ProfileRecord>, AuthError> {
    let mut attempts: u32 = 0;
    loop {
        match profiles.fetch_profile(principal_id).await {
            Err(AuthError::ProfileNetwork(reason)) if attempts < retry_limit => {
                attempts += 1;
                tracing::warn!(%reason, attempt = attempts, "profile fetch network error; retrying");
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn principal() -> Principal {
        Principal {
            id: "uid_1".into(),
            email: "user@progressly.app".into(),
        }
    }

    fn claims(role: Option<Role>, office_id: Option<&str>, mode: Option<Mode>) -> ClaimsSnapshot {
        ClaimsSnapshot {
            role,
            office_id: office_id.map(str::to_owned),
            mode,
            issued_at: Utc::now(),
        }
    }

    fn profile(role: Option<Role>, office_id: Option<&str>, mode: Option<Mode>) -> ProfileRecord {
        ProfileRecord {
            principal_id: "uid_1".into(),
            role,
            office_id: office_id.map(str::to_owned),
            mode,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn profile_mode_beats_claims_and_cache() {
        let state = reconcile(
            principal(),
            Some(&claims(Some(Role::Admin), Some("office_old"), Some(Mode::Personal))),
            Some(&profile(Some(Role::Ceo), Some("office_new"), Some(Mode::Team))),
            Some(Mode::Personal),
        );
        assert_eq!(state.mode, Some(Mode::Team));
        assert_eq!(state.role, Role::Ceo);
        assert_eq!(state.office_id.as_deref(), Some("office_new"));
    }

    #[test]
    fn claims_fill_in_when_profile_missing() {
        let state = reconcile(
            principal(),
            Some(&claims(Some(Role::Manager), Some("office_7"), None)),
            None,
            None,
        );
        assert_eq!(state.role, Role::Manager);
        assert_eq!(state.office_id.as_deref(), Some("office_7"));
        assert_eq!(state.mode, None);
    }

    #[test]
    fn cached_mode_is_last_resort() {
        let state = reconcile(
            principal(),
            Some(&claims(None, None, None)),
            None,
            Some(Mode::Personal),
        );
        assert_eq!(state.mode, Some(Mode::Personal));
    }

    #[test]
    fn no_sources_yield_fail_closed_defaults() {
        let state = reconcile(principal(), None, None, None);
        assert_eq!(state.role, Role::Employee);
        assert_eq!(state.office_id, None);
        assert_eq!(state.mode, None);
        assert!(!state.loading);
        assert!(state.is_signed_in());
    }

    #[test]
    fn profile_with_empty_fields_falls_through_per_field() {
        // A present record with absent fields does not mask claims values.
        let state = reconcile(
            principal(),
            Some(&claims(Some(Role::Admin), Some("office_2"), Some(Mode::Team))),
            Some(&profile(None, None, None)),
            None,
        );
        assert_eq!(state.role, Role::Admin);
        assert_eq!(state.office_id.as_deref(), Some("office_2"));
        assert_eq!(state.mode, Some(Mode::Team));
    }
}

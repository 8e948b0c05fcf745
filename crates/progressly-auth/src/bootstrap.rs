//! One-time mode initialization calls.
//!
//! Both calls are idempotent on the backend. On success the caller must
//! run `SessionStore::refresh(true)` so the freshly written profile record
//! and claims are observed before navigating onward.

use crate::error::AuthError;
use crate::profile::ProfileApi;

/// Initialize personal mode for the current principal.
///
/// # Errors
///
/// Propagates backend errors from the profile API.
pub async fn initialize_personal(api: &dyn ProfileApi) -> Result<(), AuthError> {
    api.initialize_personal().await?;
    tracing::debug!("personal mode initialized");
    Ok(())
}

/// Initialize team mode for the current principal.
///
/// # Errors
///
/// [`AuthError::NoOfficeMembership`] is a recoverable condition: the UI
/// offers "create office" / "join office" instead of failing the flow.
pub async fn initialize_team(api: &dyn ProfileApi) -> Result<(), AuthError> {
    match api.initialize_team().await {
        Ok(()) => {
            tracing::debug!("team mode initialized");
            Ok(())
        }
        Err(AuthError::NoOfficeMembership) => {
            tracing::debug!("team mode requested without office membership");
            Err(AuthError::NoOfficeMembership)
        }
        Err(error) => Err(error),
    }
}

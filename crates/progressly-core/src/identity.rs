//! Principal, claims, and profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Mode, Role};

/// Authenticated end-user identity for the session.
///
/// Issued by the external identity provider at sign-up; immutable for the
/// session lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque, stable provider user ID.
    pub id: String,
    pub email: String,
}

/// Point-in-time view of the custom claims embedded in the bearer token.
///
/// Ephemeral: never persisted, always re-derivable from the token. Stale
/// immediately after any server-side role/office/mode mutation until the
/// token is force-refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsSnapshot {
    pub role: Option<Role>,
    pub office_id: Option<String>,
    pub mode: Option<Mode>,
    /// Token issue time (`iat` claim).
    pub issued_at: DateTime<Utc>,
}

/// Authoritative backend record of role/office/mode for one principal.
///
/// Owned exclusively by the backend; the client only reads it and triggers
/// mutations indirectly (join/create office, switch mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub principal_id: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub office_id: Option<String>,
    #[serde(default)]
    pub mode: Option<Mode>,
    pub updated_at: DateTime<Utc>,
}

/// Element of the identity provider's auth-state stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Principal),
    SignedOut,
}

//! Bearer-token claims reading.
//!
//! Extracts the `role` / `officeId` / `mode` custom claims from the JWT
//! payload. This is a payload decode, not signature verification — the
//! backend verifies signatures; the client treats the token as
//! provider-issued. Claims become stale immediately after any server-side
//! role/office/mode mutation until the token is force-refreshed.

use base64::Engine as _;
use chrono::{DateTime, Utc};

use progressly_core::{ClaimsSnapshot, Mode, Role};

use crate::error::AuthError;
use crate::provider::IdentityProvider;

/// Reads claims from the identity provider's current token.
///
/// Forced refreshes are retried up to `retry_limit` additional times on
/// transient mint failures before surfacing
/// [`AuthError::ClaimsRefreshFailed`]. Never mutates session state.
#[derive(Debug, Clone, Copy)]
pub struct ClaimsReader {
    retry_limit: u32,
}

impl ClaimsReader {
    #[must_use]
    pub const fn new(retry_limit: u32) -> Self {
        Self { retry_limit }
    }

    /// Read a [`ClaimsSnapshot`] from the current (or freshly minted) token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] when no principal is signed in.
    /// - [`AuthError::ClaimsRefreshFailed`] when a forced mint keeps failing
    ///   past the retry bound, or the token payload cannot be decoded.
    /// - [`AuthError::TokenMint`] for a non-forced mint failure.
    pub async fn read(
        &self,
        provider: &dyn IdentityProvider,
        force_refresh: bool,
    ) -> Result<ClaimsSnapshot, AuthError> {
        if provider.current_principal().is_none() {
            return Err(AuthError::NotAuthenticated);
        }

        let mut attempts: u32 = 0;
        loop {
            match provider.mint_token(force_refresh).await {
                Ok(token) => return decode_claims(&token),
                Err(AuthError::NotAuthenticated) => return Err(AuthError::NotAuthenticated),
                Err(error) => {
                    if !force_refresh {
                        return Err(error);
                    }
                    if attempts >= self.retry_limit {
                        return Err(AuthError::ClaimsRefreshFailed(error.to_string()));
                    }
                    attempts += 1;
                    tracing::warn!(%error, attempt = attempts, "forced token mint failed; retrying");
                }
            }
        }
    }
}

/// Decode the custom claims from a JWT payload.
///
/// Unknown role/mode strings decode to `None` (fail-closed: callers default
/// privilege, never guess it).
///
/// # Errors
///
/// Returns [`AuthError::ClaimsRefreshFailed`] if the token format, base64
/// payload, or payload JSON is invalid.
pub fn decode_claims(jwt: &str) -> Result<ClaimsSnapshot, AuthError> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::ClaimsRefreshFailed("invalid JWT format".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| AuthError::ClaimsRefreshFailed(format!("base64 decode failed: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::ClaimsRefreshFailed(format!("JSON parse failed: {e}")))?;

    let role = value["role"].as_str().and_then(Role::parse);
    let office_id = value["officeId"].as_str().map(str::to_owned);
    let mode = value["mode"].as_str().and_then(Mode::parse);
    let issued_at = value["iat"]
        .as_i64()
        .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
        .unwrap_or_else(Utc::now);

    Ok(ClaimsSnapshot {
        role,
        office_id,
        mode,
        issued_at,
    })
}

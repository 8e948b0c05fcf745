//! Identity provider seam.
//!
//! The external identity provider (sign-up, token minting, auth-state
//! events) is consumed only through this trait so the session store can be
//! constructed against an in-memory fake in tests.

use async_trait::async_trait;
use tokio::sync::broadcast;

use progressly_core::{AuthEvent, Principal};

use crate::error::AuthError;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Currently signed-in principal, if any. Synchronous: reflects the
    /// provider's cached auth state.
    fn current_principal(&self) -> Option<Principal>;

    /// Return a bearer token for the current principal.
    ///
    /// With `force_refresh = false` the provider may return its cached
    /// token (claims can lag behind server-side mutations). With
    /// `force_refresh = true` it round-trips to mint a fresh token.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when signed out; `TokenMint` on provider failure.
    async fn mint_token(&self, force_refresh: bool) -> Result<String, AuthError>;

    /// Subscribe to the provider's sign-in/sign-out event stream.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;

    /// Sign the current principal out. Emits [`AuthEvent::SignedOut`] on the
    /// event stream.
    ///
    /// # Errors
    ///
    /// Provider-side sign-out failure surfaces as `TokenMint`/`Api` style
    /// errors; local session teardown does not depend on it succeeding.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

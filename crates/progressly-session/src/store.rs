//! Reactive session state holder.
//!
//! One store instance per application (browser-tab equivalent),
//! explicitly constructed and dependency-injected — no module-level
//! singleton. Publishes [`SessionState`] over a `tokio::sync::watch`
//! channel; guards and UI hold receivers.
//!
//! Concurrency model: at most one reconciliation in flight. A `refresh`
//! requested while one is running awaits the in-flight run instead of
//! issuing duplicate network calls. Every sign-in/sign-out bumps a session
//! generation; a reconciliation whose generation no longer matches at
//! completion is dropped, so sign-out can never be overwritten by a
//! late-arriving fetch.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, broadcast, watch};

use progressly_auth::claims::ClaimsReader;
use progressly_auth::mode_cache::LocalModeCache;
use progressly_auth::{IdentityProvider, ProfileApi};
use progressly_config::ApiConfig;
use progressly_core::{AuthEvent, SessionState};

use crate::reconcile;

pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileApi>,
    mode_cache: LocalModeCache,
    claims_reader: ClaimsReader,
    profile_retry_limit: u32,
    state_tx: watch::Sender<SessionState>,
    /// Bumped on every sign-in/sign-out. In-flight reconciliations capture
    /// it at start and drop their result if it moved.
    generation: AtomicU64,
    /// `Some` while a reconciliation is in flight, tagged with the
    /// generation it runs under; the receiver resolves when it completes.
    /// Same-generation callers coalesce by waiting on a clone of it.
    inflight: Mutex<Option<(u64, watch::Receiver<bool>)>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileApi>,
        mode_cache: LocalModeCache,
        api: &ApiConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::booting());
        Self {
            provider,
            profiles,
            mode_cache,
            claims_reader: ClaimsReader::new(api.claims_retry_limit),
            profile_retry_limit: api.profile_retry_limit,
            state_tx,
            generation: AtomicU64::new(0),
            inflight: Mutex::new(None),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to state changes. The receiver immediately sees the
    /// current value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Re-run the claims + profile reconciliation and republish.
    ///
    /// If a reconciliation is already running this call coalesces into it:
    /// it waits for the in-flight run to finish and returns without new
    /// network round-trips (the in-flight run's force flag wins).
    pub async fn refresh(&self, force_token_refresh: bool) {
        loop {
            let generation = self.generation.load(Ordering::SeqCst);
            let done_tx = {
                let mut guard = self.inflight.lock().await;
                if let Some((inflight_generation, done_rx)) = guard.as_ref() {
                    let same_generation = *inflight_generation == generation;
                    let mut done_rx = done_rx.clone();
                    drop(guard);
                    let _ = done_rx.changed().await;
                    if same_generation {
                        // Coalesced into the in-flight reconciliation.
                        return;
                    }
                    // The in-flight run belonged to a superseded session
                    // (its result was dropped); run our own.
                    continue;
                }
                let (done_tx, done_rx) = watch::channel(false);
                *guard = Some((generation, done_rx));
                done_tx
            };

            self.run_reconciliation(generation, force_token_refresh).await;

            *self.inflight.lock().await = None;
            let _ = done_tx.send(true);
            return;
        }
    }

    async fn run_reconciliation(&self, generation: u64, force_token_refresh: bool) {
        let state = reconcile::load_session(
            self.provider.as_ref(),
            self.profiles.as_ref(),
            &self.mode_cache,
            self.claims_reader,
            self.profile_retry_limit,
            force_token_refresh,
        )
        .await;

        if self.generation.load(Ordering::SeqCst) == generation {
            // Persist the mode before publishing so a reload between the
            // publish and the next round-trip still sees it.
            if let Some(mode) = state.mode
                && let Err(error) = self.mode_cache.store(mode)
            {
                tracing::warn!(%error, "failed to persist last-known mode");
            }
            self.state_tx.send_replace(state);
        } else {
            tracing::debug!("dropping reconciliation result from superseded session generation");
        }
    }

    /// Apply one auth event.
    ///
    /// `SignedOut` resets synchronously before returning: default state
    /// published and mode cache cleared, so no guard evaluation between
    /// sign-out and the next render can see stale elevated access.
    pub async fn handle_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(principal) => {
                self.generation.fetch_add(1, Ordering::SeqCst);
                self.state_tx
                    .send_replace(SessionState::loading_for(principal));
                self.refresh(false).await;
            }
            AuthEvent::SignedOut => self.reset(),
        }
    }

    /// Sign out: provider first, then local teardown. Local teardown does
    /// not depend on the provider call succeeding.
    pub async fn sign_out(&self) {
        if let Err(error) = self.provider.sign_out().await {
            tracing::warn!(%error, "provider sign-out failed; tearing down local session anyway");
        }
        self.reset();
    }

    fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state_tx.send_replace(SessionState::default());
        if let Err(error) = self.mode_cache.clear() {
            tracing::warn!(%error, "failed to clear mode cache on sign-out");
        }
    }

    /// Drive the store from the provider's auth event stream.
    ///
    /// Spawned once by the application shell. Reconciles a principal that
    /// is already signed in at startup, then dispatches events until the
    /// provider closes the stream.
    pub async fn run(self: Arc<Self>) {
        let mut events = self.provider.subscribe();

        if let Some(principal) = self.provider.current_principal() {
            self.handle_event(AuthEvent::SignedIn(principal)).await;
        } else {
            self.state_tx.send_replace(SessionState::default());
        }

        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "auth event stream lagged; resyncing from provider");
                    let event = self.provider.current_principal().map_or(
                        AuthEvent::SignedOut,
                        AuthEvent::SignedIn,
                    );
                    self.handle_event(event).await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

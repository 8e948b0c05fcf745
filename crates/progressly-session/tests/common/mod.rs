//! In-memory fakes for the identity provider and the profile backend.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use tokio::sync::broadcast;

use progressly_auth::{AuthError, IdentityProvider, OfficeMember, ProfileApi};
use progressly_core::{AuthEvent, Mode, Principal, ProfileRecord, Role};

pub fn principal() -> Principal {
    Principal {
        id: "uid_1".into(),
        email: "user@progressly.app".into(),
    }
}

/// Build an unsigned JWT carrying the given custom claims.
pub fn fake_jwt(role: Option<Role>, office_id: Option<&str>, mode: Option<Mode>) -> String {
    let mut payload = serde_json::json!({
        "sub": "uid_1",
        "iat": 1_700_000_000,
    });
    if let Some(role) = role {
        payload["role"] = serde_json::json!(role.as_str());
    }
    if let Some(office_id) = office_id {
        payload["officeId"] = serde_json::json!(office_id);
    }
    if let Some(mode) = mode {
        payload["mode"] = serde_json::json!(mode.as_str());
    }
    let b64 =
        |s: String| base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(s);
    format!(
        "{}.{}.{}",
        b64(r#"{"alg":"RS256"}"#.to_string()),
        b64(payload.to_string()),
        b64("fake_sig".to_string()),
    )
}

pub struct FakeProvider {
    principal: Mutex<Option<Principal>>,
    /// Token returned for non-forced mints (possibly stale claims).
    cached_token: Mutex<String>,
    /// Token returned for forced mints (fresh claims).
    fresh_token: Mutex<String>,
    pub mint_count: AtomicU32,
    events: broadcast::Sender<AuthEvent>,
}

impl FakeProvider {
    pub fn signed_in(token: String) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            principal: Mutex::new(Some(principal())),
            cached_token: Mutex::new(token.clone()),
            fresh_token: Mutex::new(token),
            mint_count: AtomicU32::new(0),
            events,
        }
    }

    pub fn signed_out() -> Self {
        let mut provider = Self::signed_in(fake_jwt(None, None, None));
        provider.principal = Mutex::new(None);
        provider
    }

    pub fn sign_in(&self, principal: Principal) {
        *self.principal.lock().unwrap() = Some(principal.clone());
        let _ = self.events.send(AuthEvent::SignedIn(principal));
    }

    pub fn set_fresh_token(&self, token: String) {
        *self.fresh_token.lock().unwrap() = token;
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn current_principal(&self) -> Option<Principal> {
        self.principal.lock().unwrap().clone()
    }

    async fn mint_token(&self, force_refresh: bool) -> Result<String, AuthError> {
        if self.principal.lock().unwrap().is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        self.mint_count.fetch_add(1, Ordering::SeqCst);
        let token = if force_refresh {
            self.fresh_token.lock().unwrap().clone()
        } else {
            self.cached_token.lock().unwrap().clone()
        };
        Ok(token)
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.principal.lock().unwrap() = None;
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }
}

/// How the fake backend answers profile fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchBehavior {
    Normal,
    NetworkError,
    Unauthorized,
}

pub struct FakeProfileApi {
    profile: Mutex<Option<ProfileRecord>>,
    behavior: Mutex<FetchBehavior>,
    /// Artificial latency before each fetch responds.
    pub fetch_delay: Mutex<Option<Duration>>,
    pub fetch_count: AtomicU32,
}

impl FakeProfileApi {
    pub fn with_profile(profile: Option<ProfileRecord>) -> Self {
        Self {
            profile: Mutex::new(profile),
            behavior: Mutex::new(FetchBehavior::Normal),
            fetch_delay: Mutex::new(None),
            fetch_count: AtomicU32::new(0),
        }
    }

    pub fn set_behavior(&self, behavior: FetchBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn set_profile(&self, profile: Option<ProfileRecord>) {
        *self.profile.lock().unwrap() = profile;
    }
}

#[async_trait]
impl ProfileApi for FakeProfileApi {
    async fn fetch_profile(
        &self,
        _principal_id: &str,
    ) -> Result<Option<ProfileRecord>, AuthError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match *self.behavior.lock().unwrap() {
            FetchBehavior::Normal => Ok(self.profile.lock().unwrap().clone()),
            FetchBehavior::NetworkError => {
                Err(AuthError::ProfileNetwork("connection refused".into()))
            }
            FetchBehavior::Unauthorized => Err(AuthError::ProfileUnauthorized),
        }
    }

    async fn initialize_personal(&self) -> Result<(), AuthError> {
        let mut profile = self.profile.lock().unwrap();
        let record = profile.get_or_insert_with(empty_profile);
        record.mode = Some(Mode::Personal);
        Ok(())
    }

    async fn initialize_team(&self) -> Result<(), AuthError> {
        let mut profile = self.profile.lock().unwrap();
        let record = profile.get_or_insert_with(empty_profile);
        if record.office_id.is_none() {
            return Err(AuthError::NoOfficeMembership);
        }
        record.mode = Some(Mode::Team);
        Ok(())
    }

    async fn create_office(&self, name: &str) -> Result<String, AuthError> {
        let office_id = format!("office_{}", name.to_lowercase());
        let mut profile = self.profile.lock().unwrap();
        let record = profile.get_or_insert_with(empty_profile);
        record.office_id = Some(office_id.clone());
        record.role = Some(Role::Ceo);
        record.mode = Some(Mode::Team);
        Ok(office_id)
    }

    async fn join_office(&self, _invite_code: &str) -> Result<(), AuthError> {
        let mut profile = self.profile.lock().unwrap();
        let record = profile.get_or_insert_with(empty_profile);
        record.office_id = Some("office_joined".into());
        record.role = Some(Role::Employee);
        record.mode = Some(Mode::Team);
        Ok(())
    }

    async fn list_members(&self, _office_id: &str) -> Result<Vec<OfficeMember>, AuthError> {
        Ok(Vec::new())
    }
}

fn empty_profile() -> ProfileRecord {
    ProfileRecord {
        principal_id: "uid_1".into(),
        role: None,
        office_id: None,
        mode: None,
        updated_at: chrono::Utc::now(),
    }
}

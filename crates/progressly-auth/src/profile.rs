//! Backend profile source and office API triggers.
//!
//! The profile record is the tie-breaker source of truth for `mode` and
//! `office_id`: claims can lag a just-committed office-join or mode-switch
//! by one token lifetime. A 404 means "no profile yet" and is not an error;
//! it routes the caller into the mode bootstrap flow.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use progressly_config::ApiConfig;
use progressly_core::{ProfileRecord, Role};

use crate::error::AuthError;
use crate::provider::IdentityProvider;

/// Member of an office, as returned by the members endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeMember {
    pub principal_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

/// Backend profile endpoint plus the office endpoints consumed only to
/// trigger a subsequent session refresh.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// Fetch the authoritative profile record. `Ok(None)` means the
    /// principal has no profile yet (HTTP 404).
    ///
    /// # Errors
    ///
    /// `ProfileUnauthorized` on 401/403, `ProfileNetwork` on transport
    /// failure, `Api` on any other non-success status.
    async fn fetch_profile(&self, principal_id: &str)
    -> Result<Option<ProfileRecord>, AuthError>;

    /// Initialize personal mode for the current principal. Idempotent.
    async fn initialize_personal(&self) -> Result<(), AuthError>;

    /// Initialize team mode for the current principal. Idempotent.
    ///
    /// # Errors
    ///
    /// `NoOfficeMembership` (HTTP 409) when the principal belongs to no
    /// office yet — recoverable, the caller offers create/join.
    async fn initialize_team(&self) -> Result<(), AuthError>;

    /// Create an office; returns the new office ID.
    async fn create_office(&self, name: &str) -> Result<String, AuthError>;

    /// Join an office by invite code.
    async fn join_office(&self, invite_code: &str) -> Result<(), AuthError>;

    /// List members of an office.
    async fn list_members(&self, office_id: &str) -> Result<Vec<OfficeMember>, AuthError>;
}

/// `reqwest` implementation of [`ProfileApi`] against the Progressly
/// backend. Bearer tokens come from the identity provider's cached token.
pub struct HttpProfileApi {
    client: reqwest::Client,
    api: ApiConfig,
    provider: Arc<dyn IdentityProvider>,
}

impl HttpProfileApi {
    #[must_use]
    pub fn new(api: ApiConfig, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api,
            provider,
        }
    }

    async fn bearer(&self) -> Result<String, AuthError> {
        self.provider.mint_token(false).await
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, AuthError> {
        let token = self.bearer().await?;
        self.client
            .get(self.api.endpoint(path))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::ProfileNetwork(format!("GET {path}: {e}")))
    }

    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, AuthError> {
        let token = self.bearer().await?;
        self.client
            .post(self.api.endpoint(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::ProfileNetwork(format!("POST {path}: {e}")))
    }
}

#[async_trait]
impl ProfileApi for HttpProfileApi {
    async fn fetch_profile(
        &self,
        _principal_id: &str,
    ) -> Result<Option<ProfileRecord>, AuthError> {
        // The backend resolves the principal from the bearer token.
        let resp = self.get("/api/profile").await?;
        if resp.status() == 404 {
            return Ok(None);
        }
        let resp = check_response(resp).await?;
        let record: ProfileRecord = resp
            .json()
            .await
            .map_err(|e| AuthError::ProfileNetwork(format!("parse profile: {e}")))?;
        Ok(Some(record))
    }

    async fn initialize_personal(&self) -> Result<(), AuthError> {
        let resp = self
            .post("/api/personal/initialize", &serde_json::json!({}))
            .await?;
        check_response(resp).await.map(|_| ())
    }

    async fn initialize_team(&self) -> Result<(), AuthError> {
        let resp = self
            .post("/api/team/initialize", &serde_json::json!({}))
            .await?;
        if resp.status() == 409 {
            return Err(AuthError::NoOfficeMembership);
        }
        check_response(resp).await.map(|_| ())
    }

    async fn create_office(&self, name: &str) -> Result<String, AuthError> {
        let resp = self
            .post("/api/offices", &serde_json::json!({ "name": name }))
            .await?;
        let resp = check_response(resp).await?;

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CreateResponse {
            office_id: String,
        }
        let created: CreateResponse = resp
            .json()
            .await
            .map_err(|e| AuthError::ProfileNetwork(format!("parse create office: {e}")))?;
        Ok(created.office_id)
    }

    async fn join_office(&self, invite_code: &str) -> Result<(), AuthError> {
        let resp = self
            .post(
                "/api/offices/join",
                &serde_json::json!({ "inviteCode": invite_code }),
            )
            .await?;
        check_response(resp).await.map(|_| ())
    }

    async fn list_members(&self, office_id: &str) -> Result<Vec<OfficeMember>, AuthError> {
        let resp = self.get(&format!("/api/offices/{office_id}/members")).await?;
        let resp = check_response(resp).await?;
        resp.json()
            .await
            .map_err(|e| AuthError::ProfileNetwork(format!("parse members: {e}")))
    }
}

/// Map common error statuses onto the [`AuthError`] taxonomy.
///
/// Returns the response unchanged on success. 401/403 become
/// [`AuthError::ProfileUnauthorized`]; any other non-success status becomes
/// [`AuthError::Api`] with the response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, AuthError> {
    let status = resp.status();
    if status == 401 || status == 403 {
        return Err(AuthError::ProfileUnauthorized);
    }
    if !status.is_success() {
        return Err(AuthError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

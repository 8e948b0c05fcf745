//! Backend API configuration.

use serde::{Deserialize, Serialize};

/// Default backend base URL (local dev server).
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

/// Default bounded retry count for transient profile fetch failures.
const fn default_profile_retry_limit() -> u32 {
    2
}

/// Default bounded retry count for forced token refresh failures.
const fn default_claims_retry_limit() -> u32 {
    2
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the Progressly backend (e.g., `https://api.progressly.app`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Additional attempts after the first failed profile fetch.
    #[serde(default = "default_profile_retry_limit")]
    pub profile_retry_limit: u32,

    /// Additional attempts after the first failed forced token mint.
    #[serde(default = "default_claims_retry_limit")]
    pub claims_retry_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            profile_retry_limit: default_profile_retry_limit(),
            claims_retry_limit: default_claims_retry_limit(),
        }
    }
}

impl ApiConfig {
    /// Join a path onto the base URL without doubling slashes.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

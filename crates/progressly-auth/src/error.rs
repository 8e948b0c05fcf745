use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No signed-in principal. Routes to the anonymous flow, never shown as
    /// a blocking error.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The identity provider failed to mint a token.
    #[error("token mint failed: {0}")]
    TokenMint(String),

    /// A forced token refresh kept failing past the bounded retry count, or
    /// the minted token could not be decoded.
    #[error("claims refresh failed: {0}")]
    ClaimsRefreshFailed(String),

    /// The backend rejected the profile read (401/403). The reconciler falls
    /// back to claims values rather than blocking sign-in.
    #[error("profile read unauthorized")]
    ProfileUnauthorized,

    /// Transport-level failure talking to the backend.
    #[error("profile network error: {0}")]
    ProfileNetwork(String),

    /// Non-success backend response outside the taxonomy above.
    #[error("backend API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// Team mode requested without an office membership. Recoverable: the
    /// caller offers create/join office.
    #[error("no office membership")]
    NoOfficeMembership,

    /// Local mode-cache I/O failure.
    #[error("mode cache error: {0}")]
    ModeCache(String),
}

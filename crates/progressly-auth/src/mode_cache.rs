//! Local last-known-mode cache.
//!
//! One file (`<dir>/mode`) holding the mode string, so a page/process
//! reload shows the correct mode before the first network round-trip
//! completes. Purely an optimization: the reconciler only consults it when
//! both the profile record and the claims are silent, and sign-out clears
//! it.

use std::fs;
use std::path::PathBuf;

use progressly_config::CacheConfig;
use progressly_core::Mode;

use crate::error::AuthError;

const MODE_FILE_NAME: &str = "mode";

#[derive(Debug, Clone)]
pub struct LocalModeCache {
    dir: PathBuf,
}

impl LocalModeCache {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Build from config, defaulting to `~/.progressly`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ModeCache`] if no directory can be resolved
    /// (no explicit config and no home directory).
    pub fn from_config(cache: &CacheConfig) -> Result<Self, AuthError> {
        cache
            .resolved_dir()
            .map(Self::new)
            .ok_or_else(|| AuthError::ModeCache("cache directory not resolvable".into()))
    }

    fn path(&self) -> PathBuf {
        self.dir.join(MODE_FILE_NAME)
    }

    /// Last-known mode, if a valid one is cached. Unknown file content is
    /// ignored.
    #[must_use]
    pub fn load(&self) -> Option<Mode> {
        let content = fs::read_to_string(self.path()).ok()?;
        Mode::parse(content.trim())
    }

    /// Persist the mode. Failures are the caller's to log; a missing cache
    /// only costs one optimistic render.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ModeCache`] if the directory or file cannot be
    /// written.
    pub fn store(&self, mode: Mode) -> Result<(), AuthError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| AuthError::ModeCache(format!("mkdir {}: {e}", self.dir.display())))?;
        let path = self.path();
        fs::write(&path, mode.as_str())
            .map_err(|e| AuthError::ModeCache(format!("write {}: {e}", path.display())))
    }

    /// Remove the cached mode. Called synchronously on sign-out.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ModeCache`] if the file exists but cannot be
    /// removed.
    pub fn clear(&self) -> Result<(), AuthError> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| AuthError::ModeCache(format!("delete {}: {e}", path.display())))?;
        }
        Ok(())
    }
}

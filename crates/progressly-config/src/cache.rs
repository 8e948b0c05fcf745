//! Local cache configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Directory for local persisted state (last-known mode). Defaults to
    /// `~/.progressly` when unset; tests point this at a tempdir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Resolve the cache directory, falling back to `~/.progressly`.
    #[must_use]
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| dirs::home_dir().map(|h| h.join(".progressly")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins_over_home() {
        let config = CacheConfig {
            dir: Some(PathBuf::from("/tmp/progressly-test")),
        };
        assert_eq!(
            config.resolved_dir(),
            Some(PathBuf::from("/tmp/progressly-test"))
        );
    }
}

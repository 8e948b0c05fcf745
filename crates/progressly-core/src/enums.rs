//! Role and mode enums for Progressly.
//!
//! Both serialize as SCREAMING_SNAKE_CASE strings, matching the custom
//! claims the identity provider embeds in the bearer token (`"CEO"`,
//! `"PERSONAL"`, ...). Unknown wire strings must be treated as absent by
//! callers (`parse` returns `None`), never mapped to a privileged value.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role of a principal inside an office.
///
/// Access control is allow-list based: each gate declares the set of roles
/// it admits. There is no linear hierarchy between roles in the data model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Ceo,
    Admin,
    Manager,
    /// Fail-closed default whenever no role can be established.
    #[default]
    Employee,
}

impl Role {
    /// Return the wire/claim string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ceo => "CEO",
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Employee => "EMPLOYEE",
        }
    }

    /// Parse a claim string. Unknown strings yield `None`, never a default.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CEO" => Some(Self::Ceo),
            "ADMIN" => Some(Self::Admin),
            "MANAGER" => Some(Self::Manager),
            "EMPLOYEE" => Some(Self::Employee),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Operating mode of a principal.
///
/// Mutually exclusive; selected once per principal (mutable via an explicit
/// switch action). `office_id` only carries meaning under `Team`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Personal,
    Team,
}

impl Mode {
    /// Return the wire/claim string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Team => "TEAM",
        }
    }

    /// Parse a claim or cache string. Unknown strings yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PERSONAL" => Some(Self::Personal),
            "TEAM" => Some(Self::Team),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

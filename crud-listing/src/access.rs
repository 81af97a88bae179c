//! Tiered access to a team's things
//!
//! Five permissions are granted in a fixed order, and an [`AccessLevel`] of
//! `n` grants the first `n` of them:
//!
//! | level | adds |
//! |---|---|
//! | 1 | `view_summary_thing`: names only, no detail links |
//! | 2 | `view_thing`: full rows and detail pages |
//! | 3 | `change_thing` |
//! | 4 | `add_thing` |
//! | 5 | `delete_thing` |
//!
//! Level 0 grants nothing. Users, groups and stored grants are not modelled:
//! [`AccessPolicy`] hands out one level per team, taken from configuration
//! unless the listing page's access switch has overridden it.
//!
//! ```rust
//! use crud_listing::access::{AccessLevel, Permission};
//!
//! let level = AccessLevel::try_from(2_u8).unwrap();
//! assert!(level.grants(Permission::View));
//! assert!(!level.grants(Permission::Change));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::error::{Error, Result};

/// One capability on a team's things, in grant order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    ViewSummary,
    View,
    Change,
    Add,
    Delete,
}

impl Permission {
    /// Every permission, in the order levels grant them
    pub const ALL: [Self; 5] = [
        Self::ViewSummary,
        Self::View,
        Self::Change,
        Self::Add,
        Self::Delete,
    ];

    #[must_use]
    pub const fn codename(self) -> &'static str {
        match self {
            Self::ViewSummary => "view_summary_thing",
            Self::View => "view_thing",
            Self::Change => "change_thing",
            Self::Add => "add_thing",
            Self::Delete => "delete_thing",
        }
    }

    /// Short label for the access switch
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViewSummary => "Summary",
            Self::View => "View",
            Self::Change => "Change",
            Self::Add => "Add",
            Self::Delete => "Delete",
        }
    }

    const fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codename())
    }
}

/// A level above [`AccessLevel::FULL`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("access level {0} is out of range (0..={max})", max = AccessLevel::FULL.get())]
pub struct LevelOutOfRange(pub u8);

/// How many permissions, counted from the start of [`Permission::ALL`], are
/// granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AccessLevel(u8);

impl AccessLevel {
    pub const NONE: Self = Self(0);
    pub const SUMMARY: Self = Self(1);
    pub const FULL: Self = Self(Permission::ALL.len() as u8);

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn grants(self, permission: Permission) -> bool {
        self.0 > permission.rank()
    }

    /// Fail with [`Error::Forbidden`] unless `permission` is granted
    ///
    /// # Errors
    ///
    /// [`Error::Forbidden`] naming the missing permission.
    pub fn require(self, permission: Permission) -> Result<()> {
        if self.grants(permission) {
            Ok(())
        } else {
            tracing::debug!(level = self.0, %permission, "Permission denied");
            Err(Error::Forbidden(format!("requires the {permission} permission")))
        }
    }

    /// The most recently granted permission; `None` at level 0
    #[must_use]
    pub fn highest(self) -> Option<Permission> {
        Permission::ALL.into_iter().rev().find(|p| self.grants(*p))
    }

    /// Every level from [`NONE`](Self::NONE) to [`FULL`](Self::FULL)
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::NONE.0..=Self::FULL.0).map(Self)
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<u8> for AccessLevel {
    type Error = LevelOutOfRange;

    fn try_from(level: u8) -> std::result::Result<Self, Self::Error> {
        if level <= Self::FULL.0 {
            Ok(Self(level))
        } else {
            Err(LevelOutOfRange(level))
        }
    }
}

impl From<AccessLevel> for u8 {
    fn from(level: AccessLevel) -> Self {
        level.0
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access level per team
///
/// Teams without an override get the configured default. Overrides live in
/// memory and are lost on restart.
#[derive(Debug, Default)]
pub struct AccessPolicy {
    default_level: AccessLevel,
    overrides: RwLock<HashMap<String, AccessLevel>>,
}

impl AccessPolicy {
    #[must_use]
    pub fn new(default_level: AccessLevel) -> Self {
        Self {
            default_level,
            overrides: RwLock::new(HashMap::new()),
        }
    }

    pub async fn level_for(&self, team: &str) -> AccessLevel {
        self.overrides
            .read()
            .await
            .get(team)
            .copied()
            .unwrap_or(self.default_level)
    }

    pub async fn set_level(&self, team: &str, level: AccessLevel) {
        self.overrides.write().await.insert(team.to_string(), level);
        tracing::info!(team, level = level.get(), "Access level changed");
    }

    /// Look up the team's level and check one permission against it
    ///
    /// # Errors
    ///
    /// [`Error::Forbidden`] when the level does not grant `permission`.
    pub async fn require(&self, team: &str, permission: Permission) -> Result<AccessLevel> {
        let level = self.level_for(team).await;
        level.require(permission)?;
        Ok(level)
    }
}

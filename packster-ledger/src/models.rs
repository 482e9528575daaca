//! Data models for persisted version records

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Version every new record starts from. The first issued version is its
/// patch successor.
pub const SEED_VERSION: &str = "0.1.0";

/// A strict `major.minor.patch` version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVer {
    /// Next patch version. Fails when the patch number is already at its
    /// maximum.
    pub fn bump_patch(self) -> Result<Self> {
        let patch = self
            .patch
            .checked_add(1)
            .ok_or_else(|| Error::VersionParse(self.to_string()))?;
        Ok(Self { patch, ..self })
    }
}

impl FromStr for SemVer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        let [major, minor, patch] = parts[..] else {
            return Err(Error::VersionParse(s.to_string()));
        };

        let parse = |part: &str| -> Result<u64> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::VersionParse(s.to_string()));
            }
            part.parse::<u64>()
                .map_err(|_| Error::VersionParse(s.to_string()))
        };

        Ok(Self {
            major: parse(major)?,
            minor: parse(minor)?,
            patch: parse(patch)?,
        })
    }
}

impl std::fmt::Display for SemVer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// One issued version and the content digest it was issued for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub version: String,
    pub hash: String,
    pub timestamp: i64,
    pub date: String,
}

/// Version history of a single package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub current: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Default for VersionRecord {
    fn default() -> Self {
        Self {
            current: SEED_VERSION.to_string(),
            history: Vec::new(),
        }
    }
}

impl VersionRecord {
    /// Find the version previously issued for `hash`
    pub fn find_by_hash(&self, hash: &str) -> Option<&HistoryEntry> {
        self.history.iter().find(|entry| entry.hash == hash)
    }
}

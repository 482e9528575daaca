//! Persisted version ledger
//!
//! Each package gets a `<state_dir>/<package>.versions.json` record mapping
//! content digests to the versions issued for them.

use chrono::Local;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::hash::{hash_files, HashAlgorithm};
use crate::models::{HistoryEntry, SemVer, VersionRecord};

/// Directory, relative to the working directory, holding version records
pub const STATE_DIR: &str = ".packster";

/// Version ledger rooted at a working directory
pub struct VersionLedger {
    root: PathBuf,
    state_dir: PathBuf,
}

impl VersionLedger {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            state_dir: root.join(STATE_DIR),
        }
    }

    pub fn record_path(&self, package: &str) -> PathBuf {
        self.state_dir.join(format!("{}.versions.json", package))
    }

    /// Load a package's record.
    ///
    /// A missing record yields a fresh one. So does a record that fails to
    /// parse, after logging a warning.
    pub fn load(&self, package: &str) -> Result<VersionRecord> {
        let path = self.record_path(package);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(VersionRecord::default()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!(
                    "Version record {} is corrupted ({}), starting a new history",
                    path.display(),
                    e
                );
                Ok(VersionRecord::default())
            }
        }
    }

    /// Write a package's record, replacing any existing file atomically
    pub fn save(&self, package: &str, record: &VersionRecord) -> Result<()> {
        fs::create_dir_all(&self.state_dir)?;

        let mut tmp = NamedTempFile::new_in(&self.state_dir)?;
        serde_json::to_writer_pretty(&mut tmp, record)?;
        tmp.write_all(b"\n")?;
        tmp.persist(self.record_path(package)).map_err(|e| e.error)?;

        Ok(())
    }

    /// Resolve the version for a package's current member set.
    ///
    /// Members are hashed with SHA-256 relative to the ledger root.
    pub fn resolve_version<P: AsRef<Path>>(&self, package: &str, members: &[P]) -> Result<String> {
        let digest = hash_files(&self.root, members, HashAlgorithm::Sha256);
        self.resolve_digest(package, &digest)
    }

    /// Return the version issued for `digest`, issuing the next patch version
    /// if the digest has not been seen before.
    pub fn resolve_digest(&self, package: &str, digest: &str) -> Result<String> {
        let mut record = self.load(package)?;

        if let Some(entry) = record.find_by_hash(digest) {
            tracing::debug!("Content unchanged for {}, reusing {}", package, entry.version);
            return Ok(entry.version.clone());
        }

        let current: SemVer = record.current.parse()?;
        let version = current.bump_patch()?.to_string();

        let now = Local::now();
        record.history.push(HistoryEntry {
            version: version.clone(),
            hash: digest.to_string(),
            timestamp: now.timestamp(),
            date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        });
        record.current = version.clone();

        self.save(package, &record)?;
        tracing::info!("Issued version {} for {}", version, package);

        Ok(version)
    }
}

//! packster-ledger: Content hashing and version history for packster packages
//!
//! This crate provides:
//! - Order-independent digests over a package's member files
//! - Persisted per-package version records keyed by content digest
//! - Patch-level auto-versioning that reuses versions for repeated content

pub mod error;
pub mod hash;
pub mod ledger;
pub mod models;

pub use error::{Error, Result};
pub use hash::{hash_files, HashAlgorithm};
pub use ledger::VersionLedger;
pub use models::*;

//! packster: manifest-driven zip packager
//!
//! Reads `packster.json`, collects each package's files with include and
//! exclude globs, names the output from a template (optionally with a
//! content-derived version) and writes a zip archive per package.

pub mod archive;
pub mod collector;
pub mod error;
pub mod init;
pub mod manifest;
pub mod matcher;
pub mod naming;
pub mod packager;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use manifest::{Manifest, PackageSpec, VersionSpec};
pub use packager::{Packager, RunSummary};
pub use types::RunConfig;

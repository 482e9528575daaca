//! Member collection
//!
//! Expands a package's `dirs` and `files` entries into an ordered,
//! deduplicated member set. A single [`CollectionState`] is threaded through
//! every entry of a package so that overlapping globs never include a path
//! twice and an exclusion decided by an earlier entry also binds later ones.

use std::path::{Path, PathBuf};

use glob::Pattern;
use indexmap::IndexSet;
use packster_ledger::ledger::STATE_DIR;
use tracing::{debug, warn};

use crate::{
    error::Result,
    manifest::PackageSpec,
    matcher::ExcludeMatcher,
    utils::normalize_member,
};

/// Accepted and rejected paths of one package, relative to the root
#[derive(Debug, Clone, Default)]
pub struct CollectionState {
    pub matched: IndexSet<PathBuf>,
    pub skipped: IndexSet<PathBuf>,
}

impl CollectionState {
    pub fn members(&self) -> Vec<PathBuf> {
        self.matched.iter().cloned().collect()
    }
}

fn candidate_pattern(root: &Path, pattern: &str, recursive: bool) -> String {
    let base = Pattern::escape(&root.to_string_lossy());
    let pattern = pattern.trim_end_matches('/');
    if recursive {
        format!("{}/{}/**/*", base, pattern)
    } else {
        format!("{}/{}", base, pattern)
    }
}

/// Collect the candidates of one glob entry into `state`.
///
/// With `recursive`, every path nested below directories matching `pattern`
/// is a candidate; otherwise only the paths `pattern` matches directly. With
/// `directories_are_invalid`, directory candidates are ignored without being
/// recorded.
pub fn collect(
    root: &Path,
    pattern: &str,
    excludes: &ExcludeMatcher,
    state: &mut CollectionState,
    recursive: bool,
    directories_are_invalid: bool,
) -> Result<()> {
    let search = candidate_pattern(root, pattern, recursive);

    for entry in glob::glob(&search)? {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Glob error: {}", e);
                continue;
            }
        };

        let relative = normalize_member(path.strip_prefix(root).unwrap_or(&path));

        if state.skipped.contains(&relative) || state.matched.contains(&relative) {
            continue;
        }

        if directories_are_invalid && path.is_dir() {
            continue;
        }

        if excludes.is_excluded(&relative) {
            state.skipped.insert(relative);
            continue;
        }

        debug!("Found: {}", relative.display());
        state.matched.insert(relative);
    }

    Ok(())
}

/// Collect every `dirs` entry, then every `files` entry, of a package.
///
/// The version state directory and the package's output directory are never
/// members; paths below them are recorded as skipped.
pub fn collect_package(root: &Path, spec: &PackageSpec) -> Result<CollectionState> {
    let out_dir = Path::new(&spec.out_dir);
    let out_dir = normalize_member(out_dir.strip_prefix(root).unwrap_or(out_dir));
    let excludes = ExcludeMatcher::new(&spec.exclude)?
        .with_reserved(PathBuf::from(STATE_DIR))
        .with_reserved(out_dir);
    let mut state = CollectionState::default();

    for dir in &spec.dirs {
        collect(root, dir, &excludes, &mut state, true, false)?;
    }

    for file in &spec.files {
        collect(root, file, &excludes, &mut state, false, true)?;
    }

    Ok(state)
}

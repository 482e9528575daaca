//! Per-package processing: collect, name, archive

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::{
    archive::stage_archive,
    collector::collect_package,
    error::{Error, Result},
    manifest::{Manifest, PackageSpec},
    naming::resolve_output_name,
    types::RunConfig,
};

/// Outcome of a run over one or more packages
#[derive(Debug, Default)]
pub struct RunSummary {
    pub packed: Vec<PathBuf>,
    pub failed: Vec<String>,
}

pub struct Packager<'a> {
    config: &'a RunConfig,
    manifest: &'a Manifest,
}

impl<'a> Packager<'a> {
    pub fn new(config: &'a RunConfig, manifest: &'a Manifest) -> Self {
        Self { config, manifest }
    }

    /// Packages this run will process, in manifest order.
    ///
    /// Fails before anything is written when `--package` names an unknown
    /// package, or when `--dist` would apply to more than one package.
    pub fn targets(&self) -> Result<Vec<(&'a str, &'a PackageSpec)>> {
        if let Some(name) = &self.config.package {
            let (name, spec) = self
                .manifest
                .packages
                .get_key_value(name.as_str())
                .ok_or_else(|| Error::PackageNotFound(name.clone()))?;
            return Ok(vec![(name.as_str(), spec)]);
        }

        if self.config.dist_name.is_some() && self.manifest.packages.len() > 1 {
            return Err(Error::DistWithoutPackage);
        }

        Ok(self
            .manifest
            .packages
            .iter()
            .map(|(name, spec)| (name.as_str(), spec))
            .collect())
    }

    /// Process every target package.
    ///
    /// A failing package is reported and the run moves on, unless the
    /// failure is fatal.
    pub fn run(&self) -> Result<RunSummary> {
        let targets = self.targets()?;
        let mut summary = RunSummary::default();

        for (name, spec) in targets {
            match self.package(name, spec) {
                Ok(path) => summary.packed.push(path),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("Failed to package {}: {}", name, e);
                    summary.failed.push(name.to_string());
                }
            }
        }

        Ok(summary)
    }

    /// Build the archive for a single package.
    ///
    /// The archive is written to a temp file first, so a member that cannot
    /// be read fails the package before a version is issued or an archive
    /// appears in the output directory.
    pub fn package(&self, name: &str, spec: &PackageSpec) -> Result<PathBuf> {
        info!("Processing:  {}", name);
        let root = &self.config.root;

        let state = collect_package(root, spec)?;
        for path in &state.skipped {
            debug!("Skipped: {}", path.display());
        }

        let members = state.members();
        if members.is_empty() {
            warn!("No files matched for {}", name);
        }

        let staged = stage_archive(root, &members, &root.join(&spec.out_dir))?;
        let file_name = resolve_output_name(
            root,
            name,
            spec,
            self.config.dist_name.as_deref(),
            &members,
        )?;

        info!("Output to:   {}", Path::new(&spec.out_dir).join(&file_name).display());
        staged.persist(&file_name)
    }
}

use std::path::PathBuf;

use tracing::Level;

/// Settings for one invocation, built once from the command line
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Directory manifests, globs, records and outputs are resolved against
    pub root: PathBuf,
    pub verbose: bool,
    pub quiet: bool,
    /// Explicit output filename, bypassing the template
    pub dist_name: Option<String>,
    /// Restrict the run to one package
    pub package: Option<String>,
}

impl RunConfig {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::WARN
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

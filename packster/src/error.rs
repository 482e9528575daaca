use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Ledger(#[from] packster_ledger::Error),

    #[error("No {} was found", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("packster.json does not reference package \"{0}\"")]
    PackageNotFound(String),

    #[error("--dist requires --package when the manifest defines more than one package")]
    DistWithoutPackage,

    #[error("Invalid output name template: {0}")]
    Template(String),

    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} package(s) failed")]
    PackagesFailed(usize),
}

impl Error {
    /// Whether the error ends the whole run rather than a single package
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Ledger(packster_ledger::Error::VersionParse(_))
                | Error::ManifestNotFound(_)
                | Error::PackageNotFound(_)
                | Error::DistWithoutPackage
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

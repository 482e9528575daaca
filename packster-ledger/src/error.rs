use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid version '{0}': expected major.minor.patch")]
    VersionParse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

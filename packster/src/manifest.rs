//! Manifest (`packster.json`) parsing

use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

pub const MANIFEST_FILE: &str = "packster.json";
pub const PACKAGE_JSON: &str = "package.json";
pub const DEFAULT_VERSION: &str = "1";

/// Parsed manifest. Packages keep the order they are declared in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub packages: IndexMap<String, PackageSpec>,
}

impl Manifest {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load `packster.json` from `root`
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(Error::ManifestNotFound(path));
        }
        let content = fs::read_to_string(&path)?;
        Self::from_json(&content)
    }
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_out_name() -> String {
    "{TIMESTAMP}-{PACKAGE_NAME}".to_string()
}

fn default_out_ext() -> String {
    "zip".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    /// Directory globs, traversed recursively
    #[serde(default)]
    pub dirs: Vec<String>,
    /// File globs, matched against the working directory only
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    #[serde(default = "default_out_name")]
    pub out_name: String,
    #[serde(default = "default_out_ext")]
    pub out_ext: String,
    #[serde(default)]
    pub version: VersionSpec,
}

impl Default for PackageSpec {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            files: Vec::new(),
            exclude: Vec::new(),
            out_dir: default_out_dir(),
            out_name: default_out_name(),
            out_ext: default_out_ext(),
            version: VersionSpec::Unset,
        }
    }
}

/// The `version` field of a package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionSpec {
    /// Absent, `null` or `false`: use the `package.json` fallback
    #[default]
    Unset,
    /// `true`: issue versions from the content ledger
    Auto,
    /// A string or number, used verbatim
    Literal(String),
}

impl<'de> Deserialize<'de> for VersionSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            None,
            Flag(bool),
            Text(String),
            Number(serde_json::Number),
        }

        match Helper::deserialize(deserializer)? {
            Helper::None | Helper::Flag(false) => Ok(VersionSpec::Unset),
            Helper::Flag(true) => Ok(VersionSpec::Auto),
            Helper::Text(s) => Ok(VersionSpec::Literal(s)),
            Helper::Number(n) => Ok(VersionSpec::Literal(n.to_string())),
        }
    }
}

/// Version from the sibling `package.json`, or `"1"` when it is missing,
/// unreadable or has no usable `version` field.
pub fn fallback_version(root: &Path) -> String {
    let path = root.join(PACKAGE_JSON);
    let Ok(content) = fs::read_to_string(&path) else {
        return DEFAULT_VERSION.to_string();
    };

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Ignoring {}: {}", path.display(), e);
            return DEFAULT_VERSION.to_string();
        }
    };

    match value.get("version") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => DEFAULT_VERSION.to_string(),
    }
}

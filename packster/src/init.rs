use std::{fs, path::Path};

use serde_json::json;

use crate::{error::Result, manifest::MANIFEST_FILE};

/// Starter manifest packaging everything in the working directory
pub fn default_manifest() -> serde_json::Value {
    json!({
        "packages": {
            "Project": {
                "dirs": ["*"],
                "files": ["*"],
                "exclude": []
            }
        }
    })
}

/// Write the starter manifest into `root`.
///
/// Returns `false` without touching anything if a manifest already exists.
pub fn create_manifest(root: &Path) -> Result<bool> {
    let path = root.join(MANIFEST_FILE);
    if path.exists() {
        return Ok(false);
    }

    let content = serde_json::to_string_pretty(&default_manifest())?;
    fs::write(&path, content + "\n")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use tempfile::TempDir;

    #[test]
    fn test_creates_loadable_manifest() {
        let dir = TempDir::new().unwrap();
        assert!(create_manifest(dir.path()).unwrap());

        let manifest = Manifest::load(dir.path()).unwrap();
        let spec = &manifest.packages["Project"];
        assert_eq!(spec.dirs, vec!["*"]);
        assert_eq!(spec.files, vec!["*"]);
        assert!(spec.exclude.is_empty());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{}").unwrap();

        assert!(!create_manifest(dir.path()).unwrap());
        assert_eq!(
            fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap(),
            "{}"
        );
    }
}

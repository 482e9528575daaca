use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::debug;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::{
    error::{Error, Result},
    utils::member_name,
};

/// A fully written archive waiting in a temp file inside its output
/// directory. Dropping it removes the temp file.
pub struct StagedArchive {
    file: NamedTempFile,
    out_dir: PathBuf,
}

impl StagedArchive {
    /// Move the archive to `out_dir/file_name`, replacing any existing file
    pub fn persist(self, file_name: &str) -> Result<PathBuf> {
        let output_path = self.out_dir.join(file_name);
        self.file.persist(&output_path).map_err(|e| e.error)?;
        Ok(output_path)
    }
}

/// Write `members` (relative to `root`) into a temp archive in `out_dir`.
///
/// Entries are named by each member's relative path and written in the
/// order given. Nothing is left in `out_dir` if any member fails.
pub fn stage_archive<P: AsRef<Path>>(
    root: &Path,
    members: &[P],
    out_dir: &Path,
) -> Result<StagedArchive> {
    if !out_dir.exists() {
        fs::create_dir_all(out_dir).map_err(|source| Error::OutputDir {
            path: out_dir.to_path_buf(),
            source,
        })?;
    }

    let tmp = tempfile::Builder::new()
        .prefix(".packster-")
        .suffix(".part")
        .tempfile_in(out_dir)?;
    let mut zip = ZipWriter::new(BufWriter::new(tmp));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for member in members {
        let member = member.as_ref();
        let name = member_name(member);
        let source_path = root.join(member);

        if source_path.is_dir() {
            debug!("Adding directory: {}/", name);
            zip.add_directory(name, options)?;
            continue;
        }

        let mut source = File::open(&source_path)?;
        debug!("Adding: {}", name);
        zip.start_file(name, options)?;
        io::copy(&mut source, &mut zip)?;
    }

    let file = zip.finish()?.into_inner().map_err(|e| e.into_error())?;
    Ok(StagedArchive {
        file,
        out_dir: out_dir.to_path_buf(),
    })
}

/// Write `members` into `out_dir/file_name`. Returns the archive path.
pub fn write_archive<P: AsRef<Path>>(
    root: &Path,
    members: &[P],
    file_name: &str,
    out_dir: &Path,
) -> Result<PathBuf> {
    stage_archive(root, members, out_dir)?.persist(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn entries(path: &Path) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut entry = archive.by_index(i).unwrap();
                let mut content = String::new();
                entry.read_to_string(&mut content).unwrap();
                (entry.name().to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_writes_members_in_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("README.md"), "readme").unwrap();

        let out_dir = dir.path().join("dist");
        let members = ["src/a.txt", "README.md"];
        let written = write_archive(dir.path(), &members, "Demo.zip", &out_dir).unwrap();

        assert_eq!(written, out_dir.join("Demo.zip"));
        assert_eq!(
            entries(&written),
            vec![
                ("src/a.txt".to_string(), "alpha".to_string()),
                ("README.md".to_string(), "readme".to_string()),
            ]
        );
    }

    #[test]
    fn test_creates_nested_output_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let out_dir = dir.path().join("build/out");
        write_archive(dir.path(), &["a.txt"], "x.zip", &out_dir).unwrap();
        assert!(out_dir.join("x.zip").is_file());
    }

    #[test]
    fn test_directory_members_become_directory_entries() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/empty")).unwrap();

        let out_dir = dir.path().join("dist");
        let written = write_archive(dir.path(), &["src/empty"], "d.zip", &out_dir).unwrap();

        let mut archive = ZipArchive::new(File::open(written).unwrap()).unwrap();
        let entry = archive.by_index(0).unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.name(), "src/empty/");
    }

    #[test]
    fn test_unreadable_member_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let out_dir = dir.path().join("dist");
        let result = write_archive(dir.path(), &["a.txt", "gone.txt"], "x.zip", &out_dir);

        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_staged_archive_is_dropped_without_persist() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let out_dir = dir.path().join("dist");
        let staged = stage_archive(dir.path(), &["a.txt"], &out_dir).unwrap();
        assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 1);
        drop(staged);
        assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_output_dir_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dist"), "not a directory").unwrap();

        let out_dir = dir.path().join("dist/sub");
        let paths: [&str; 0] = [];
        let result = write_archive(dir.path(), &paths, "x.zip", &out_dir);
        assert!(matches!(result, Err(Error::OutputDir { .. })));
    }
}

//! Content digests over member sets
//!
//! Only file contents are hashed, fed in ascending path order so that the
//! order paths were discovered in never changes the result.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

const CHUNK_SIZE: usize = 8192;

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha256,
    Sha1,
    Md5,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Md5 => "MD5",
        }
    }

    /// Parse a placeholder name such as `SHA256`. Case sensitive.
    pub fn from_placeholder(s: &str) -> Option<Self> {
        match s {
            "SHA256" => Some(HashAlgorithm::Sha256),
            "SHA1" => Some(HashAlgorithm::Sha1),
            "MD5" => Some(HashAlgorithm::Md5),
            _ => None,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compute a lowercase hex digest over the contents of `paths`.
///
/// Paths are resolved against `root` and sorted by their string form before
/// hashing. Files that cannot be opened or read are left out of the digest;
/// they never abort it.
pub fn hash_files<P: AsRef<Path>>(root: &Path, paths: &[P], algorithm: HashAlgorithm) -> String {
    let mut sorted: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
    sorted.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));

    match algorithm {
        HashAlgorithm::Sha256 => digest_files::<Sha256>(root, &sorted),
        HashAlgorithm::Sha1 => digest_files::<Sha1>(root, &sorted),
        HashAlgorithm::Md5 => digest_files::<Md5>(root, &sorted),
    }
}

fn digest_files<D: Digest>(root: &Path, sorted: &[PathBuf]) -> String {
    let mut hasher = D::new();
    for path in sorted {
        let full_path = root.join(path);
        if let Err(e) = feed_file(&mut hasher, &full_path) {
            tracing::debug!("Not hashing {}: {}", full_path.display(), e);
        }
    }
    hex::encode(hasher.finalize())
}

fn feed_file<D: Digest>(hasher: &mut D, path: &Path) -> std::io::Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hello.txt"), b"hello ").unwrap();
        fs::write(dir.path().join("world.txt"), b"world").unwrap();
        dir
    }

    #[test]
    fn test_sha256_known_value() {
        let dir = fixture();
        let hash = hash_files(dir.path(), &["hello.txt", "world.txt"], HashAlgorithm::Sha256);
        // SHA256 of "hello world"
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_sha1_known_value() {
        let dir = fixture();
        let hash = hash_files(dir.path(), &["hello.txt", "world.txt"], HashAlgorithm::Sha1);
        assert_eq!(hash, "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
    }

    #[test]
    fn test_md5_known_value() {
        let dir = fixture();
        let hash = hash_files(dir.path(), &["hello.txt", "world.txt"], HashAlgorithm::Md5);
        assert_eq!(hash, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn test_hash_is_order_independent() {
        let dir = fixture();
        let forward = hash_files(dir.path(), &["hello.txt", "world.txt"], HashAlgorithm::Sha256);
        let reversed = hash_files(dir.path(), &["world.txt", "hello.txt"], HashAlgorithm::Sha256);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let dir = fixture();
        let before = hash_files(dir.path(), &["hello.txt"], HashAlgorithm::Sha256);
        fs::write(dir.path().join("hello.txt"), b"hello!").unwrap();
        let after = hash_files(dir.path(), &["hello.txt"], HashAlgorithm::Sha256);
        assert_ne!(before, after);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = fixture();
        let with_missing = hash_files(
            dir.path(),
            &["hello.txt", "missing.txt", "world.txt"],
            HashAlgorithm::Sha256,
        );
        let without = hash_files(dir.path(), &["hello.txt", "world.txt"], HashAlgorithm::Sha256);
        assert_eq!(with_missing, without);
    }

    #[test]
    fn test_empty_set_hashes_empty_input() {
        let dir = TempDir::new().unwrap();
        let paths: [&str; 0] = [];
        assert_eq!(
            hash_files(dir.path(), &paths, HashAlgorithm::Sha256),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_algorithm_placeholder_names() {
        assert_eq!(HashAlgorithm::from_placeholder("SHA256"), Some(HashAlgorithm::Sha256));
        assert_eq!(HashAlgorithm::from_placeholder("MD5"), Some(HashAlgorithm::Md5));
        assert_eq!(HashAlgorithm::from_placeholder("sha1"), None);
    }
}

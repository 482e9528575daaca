use std::path::{Component, Path, PathBuf};

/// Lexically normalize a relative member path.
///
/// `.` components are dropped. Symlinks are not resolved and `..` is kept
/// as written.
pub fn normalize_member(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// String form of a member path with `/` separators, used both for exclude
/// matching and as the in-archive entry name.
pub fn member_name(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Append `.{ext}` unless `name` already ends with it
pub fn with_extension(name: &str, ext: &str) -> String {
    if ext.is_empty() {
        return name.to_string();
    }
    let suffix = format!(".{}", ext);
    if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{}{}", name, suffix)
    }
}

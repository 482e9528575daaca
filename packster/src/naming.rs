//! Output filename resolution
//!
//! Templates may contain `{PACKAGE_NAME}`, `{VERSION}`, `{TIMESTAMP}`,
//! `{EPOCH}` and the digest placeholders `{SHA256}`, `{SHA1}` and `{MD5}`,
//! each of which accepts a `:N` suffix keeping only the first `N` hex
//! characters.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use chrono::{DateTime, Local};
use packster_ledger::{hash_files, HashAlgorithm, VersionLedger};
use regex::Regex;

use crate::{
    error::{Error, Result},
    manifest::{fallback_version, PackageSpec, VersionSpec},
    utils::with_extension,
};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder regex is valid"));

/// Digests over a member set, computed on first use and cached per algorithm
pub struct MemberDigests<'a> {
    root: &'a Path,
    members: &'a [PathBuf],
    cache: HashMap<HashAlgorithm, String>,
}

impl<'a> MemberDigests<'a> {
    pub fn new(root: &'a Path, members: &'a [PathBuf]) -> Self {
        Self {
            root,
            members,
            cache: HashMap::new(),
        }
    }

    pub fn get(&mut self, algorithm: HashAlgorithm) -> &str {
        self.cache
            .entry(algorithm)
            .or_insert_with(|| hash_files(self.root, self.members, algorithm))
    }

    /// Number of algorithms hashed so far
    pub fn computed(&self) -> usize {
        self.cache.len()
    }
}

/// Values for the non-digest placeholders
#[derive(Debug, Clone)]
pub struct TemplateVars {
    pub package_name: String,
    pub version: String,
    pub timestamp: String,
    pub epoch: i64,
}

impl TemplateVars {
    pub fn new(package_name: &str, version: String, now: DateTime<Local>) -> Self {
        Self {
            package_name: package_name.to_string(),
            version,
            timestamp: now.format("%Y%m%d%H%M%S").to_string(),
            epoch: now.timestamp(),
        }
    }
}

/// A parsed piece of an output name template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'t> {
    Literal(&'t str),
    Digest(HashAlgorithm, Option<usize>),
    Timestamp,
    Epoch,
    PackageName,
    Version,
}

fn check_literal(literal: &str) -> Result<&str> {
    if literal.contains(['{', '}']) {
        return Err(Error::Template(format!("unmatched brace in \"{}\"", literal)));
    }
    Ok(literal)
}

fn parse_placeholder(token: &str) -> Result<Segment<'static>> {
    let (name, length) = match token.split_once(':') {
        Some((name, length)) => {
            let length = length.parse::<usize>().map_err(|_| {
                Error::Template(format!("invalid length in placeholder {{{}}}", token))
            })?;
            (name, Some(length))
        }
        None => (token, None),
    };

    if let Some(algorithm) = HashAlgorithm::from_placeholder(name) {
        return Ok(Segment::Digest(algorithm, length));
    }

    if length.is_some() {
        return Err(Error::Template(format!(
            "placeholder {{{}}} does not take a length",
            name
        )));
    }

    match name {
        "TIMESTAMP" => Ok(Segment::Timestamp),
        "EPOCH" => Ok(Segment::Epoch),
        "PACKAGE_NAME" => Ok(Segment::PackageName),
        "VERSION" => Ok(Segment::Version),
        other => Err(Error::Template(format!(
            "unrecognized placeholder {{{}}}",
            other
        ))),
    }
}

/// Split `template` into literals and placeholders.
///
/// Unknown placeholders and braces outside a placeholder are rejected.
pub fn parse_template(template: &str) -> Result<Vec<Segment<'_>>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(token)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Literal(check_literal(&template[last..whole.start()])?));
        }
        segments.push(parse_placeholder(token.as_str())?);
        last = whole.end();
    }

    if last < template.len() {
        segments.push(Segment::Literal(check_literal(&template[last..])?));
    }
    Ok(segments)
}

/// Render parsed segments
pub fn render(
    segments: &[Segment<'_>],
    vars: &TemplateVars,
    digests: &mut MemberDigests<'_>,
) -> String {
    let mut output = String::new();
    for segment in segments {
        match *segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Digest(algorithm, length) => {
                let digest = digests.get(algorithm);
                let end = length.map_or(digest.len(), |n| n.min(digest.len()));
                output.push_str(&digest[..end]);
            }
            Segment::Timestamp => output.push_str(&vars.timestamp),
            Segment::Epoch => output.push_str(&vars.epoch.to_string()),
            Segment::PackageName => output.push_str(&vars.package_name),
            Segment::Version => output.push_str(&vars.version),
        }
    }
    output
}

/// Expand every placeholder in `template`
pub fn expand_template(
    template: &str,
    vars: &TemplateVars,
    digests: &mut MemberDigests<'_>,
) -> Result<String> {
    let segments = parse_template(template)?;
    Ok(render(&segments, vars, digests))
}

/// Version for a package: a literal `version`, the content ledger for
/// `version: true`, otherwise the `package.json` fallback.
pub fn resolve_version(
    root: &Path,
    package: &str,
    spec: &PackageSpec,
    members: &[PathBuf],
) -> Result<String> {
    match &spec.version {
        VersionSpec::Literal(version) => Ok(version.clone()),
        VersionSpec::Auto => Ok(VersionLedger::new(root).resolve_version(package, members)?),
        VersionSpec::Unset => Ok(fallback_version(root)),
    }
}

/// Compute the archive filename for a package.
///
/// An explicit `dist_name` bypasses templating and only gains the output
/// extension when it lacks it.
pub fn resolve_output_name(
    root: &Path,
    package: &str,
    spec: &PackageSpec,
    dist_name: Option<&str>,
    members: &[PathBuf],
) -> Result<String> {
    if let Some(dist_name) = dist_name {
        return Ok(with_extension(dist_name, &spec.out_ext));
    }

    // Validate before the ledger can issue a version
    let segments = parse_template(&spec.out_name)?;
    let version = resolve_version(root, package, spec, members)?;
    let vars = TemplateVars::new(package, version, Local::now());
    let mut digests = MemberDigests::new(root, members);
    let name = render(&segments, &vars, &mut digests);

    Ok(with_extension(&name, &spec.out_ext))
}

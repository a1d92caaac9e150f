use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// Placeholder substituted by the new version in messages and tag patterns.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// The old and new version strings of one release.
///
/// Both are opaque tokens: they are never parsed, only searched for and
/// substituted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersions {
    pub old: String,
    pub new: String,
}

impl ReleaseVersions {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        ReleaseVersions {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Builds the version pair from optional command-line values.
    ///
    /// An absent or empty value is reported against the flag that should
    /// have carried it.
    pub fn from_args(old: Option<&str>, new: Option<&str>) -> Result<Self> {
        let old = old
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ReleaseError::missing_argument("--old"))?;
        let new = new
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ReleaseError::missing_argument("--new"))?;
        Ok(ReleaseVersions::new(old, new))
    }

    pub fn is_identical(&self) -> bool {
        self.old == self.new
    }
}

/// Replaces every `{version}` placeholder in `template` with `version`.
///
/// No normalization is applied: `v{version}` with `2.0` renders `v2.0`.
pub fn render_template(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

/// Substitutes `new` for every occurrence of `old` in `content`.
///
/// Returns `None` when `old` does not occur at all.
pub fn substitute_version(content: &str, old: &str, new: &str) -> Option<String> {
    if content.contains(old) {
        Some(content.replace(old, new))
    } else {
        None
    }
}

/// Rewrites one file in place, replacing the old version with the new one.
///
/// # Returns
/// * `Ok(())` - File rewritten (byte-identical when both versions are equal)
/// * `Err(VersionNotFound)` - The old version does not occur in the file;
///   the file is left untouched
/// * `Err(Io)` - The file cannot be read or written
pub fn replace_version(path: &Path, versions: &ReleaseVersions) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let updated = substitute_version(&content, &versions.old, &versions.new)
        .ok_or_else(|| ReleaseError::version_not_found(path, versions.old.as_str()))?;
    fs::write(path, updated)?;
    Ok(())
}

/// Rewrites every file in `files` (relative to `root`) in list order.
///
/// Stops at the first file that does not contain the old version; files
/// before it stay rewritten and files after it are not touched.
///
/// # Returns
/// The rewritten paths, relative to `root`, in list order.
pub fn bump_files(root: &Path, files: &[String], versions: &ReleaseVersions) -> Result<Vec<PathBuf>> {
    let mut bumped = Vec::with_capacity(files.len());

    for file in files {
        let relative = PathBuf::from(file);
        let absolute = root.join(&relative);
        replace_version(&absolute, versions).map_err(|e| match e {
            // report the path as configured rather than the joined absolute one
            ReleaseError::VersionNotFound { version, .. } => {
                ReleaseError::version_not_found(relative.clone(), version)
            }
            other => other,
        })?;
        log::debug!("bumped {} from {} to {}", file, versions.old, versions.new);
        bumped.push(relative);
    }

    Ok(bumped)
}

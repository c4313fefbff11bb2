//! Target directory naming: `<target_root>/<YYYY>/<label>`.
//!
//! The label comes from the nearest date-bearing directory component when
//! there is one (computed once per source directory), otherwise from the
//! file's own resolved date as `YYYYMMDD`.

use std::path::{Component, Path, PathBuf};

use crate::date::{DateResolver, PathHint, ResolvedDate, scan_components};
use crate::entry::SourceEntry;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetDirectorySpec {
    /// Four-digit year bucket.
    pub year: String,
    /// Directory label; never starts with `DCIM-`.
    pub label: String,
}

impl TargetDirectorySpec {
    /// Spec for a path-derived label, if the hint carries one.
    pub fn from_hint(hint: &PathHint) -> Option<Self> {
        Some(Self {
            year: format!("{:04}", hint.year()?),
            label: hint.label()?.to_string(),
        })
    }

    /// Spec labelled by a resolved date.
    pub fn from_date(resolved: &ResolvedDate) -> Self {
        Self {
            year: format!("{:04}", resolved.year()),
            label: resolved.date.format("%Y%m%d").to_string(),
        }
    }

    /// Absolute target directory below `target_root`.
    pub fn dir_under(&self, target_root: &Path) -> PathBuf {
        target_root.join(&self.year).join(&self.label)
    }
}

/// Directory components from `source_root` (its own name included) down to `dir`.
/// Components above the source root never influence naming.
pub fn relative_components(source_root: &Path, dir: &Path) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(name) = source_root.file_name() {
        out.push(name.to_string_lossy().into_owned());
    }
    if let Ok(rel) = dir.strip_prefix(source_root) {
        out.extend(rel.components().filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        }));
    }
    out
}

pub struct DirectoryNameResolver<'a> {
    dates: &'a DateResolver<'a>,
}

impl<'a> DirectoryNameResolver<'a> {
    pub fn new(dates: &'a DateResolver<'a>) -> Self {
        Self { dates }
    }

    /// Full resolution for one entry from its directory components.
    pub fn resolve_target<S: AsRef<str>>(
        &self,
        entry: &SourceEntry,
        components: &[S],
    ) -> TargetDirectorySpec {
        let hint = scan_components(components);
        let resolved = self.dates.resolve_with_hint(entry, &hint, true);
        resolve_with(&hint, &resolved)
    }
}

/// Combine a directory's hint with a file's resolved date.
pub fn resolve_with(hint: &PathHint, resolved: &ResolvedDate) -> TargetDirectorySpec {
    TargetDirectorySpec::from_hint(hint).unwrap_or_else(|| TargetDirectorySpec::from_date(resolved))
}

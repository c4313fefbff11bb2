//! File classification by name and extension.
//!
//! Checks run in a fixed order and the first match wins:
//! forbidden extension, junk file name, media extension, otherwise `Other`.

use crate::entry::SourceEntry;

/// Extensions organized by date (lowercase).
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "gif", "png", "bmp", "pdf", "wav", "mp3", "avi", "mov", "mpg", "3gp", "m4v",
    "mp4",
];

/// Executable types that are removed on sight.
const FORBIDDEN_EXTENSIONS: &[&str] = &["exe", "dll"];

/// Exact junk names (compared case-insensitively).
const TRASH_NAMES: &[&str] = &["thumbs.db", ".ds_store"];

/// Junk name prefixes.
const TRASH_PREFIXES: &[&str] = &[".trashed", "._"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Media,
    Other,
    Trash,
    Forbidden,
}

impl Classification {
    /// Files removed instead of relocated.
    pub fn is_disposable(self) -> bool {
        matches!(self, Classification::Trash | Classification::Forbidden)
    }
}

/// Classify a file from its name and (any-case) extension.
pub fn classify_name(file_name: &str, extension: Option<&str>) -> Classification {
    let ext = extension.map(str::to_ascii_lowercase);
    let ext = ext.as_deref();

    if ext.is_some_and(|e| FORBIDDEN_EXTENSIONS.contains(&e)) {
        return Classification::Forbidden;
    }

    let lower = file_name.to_ascii_lowercase();
    if TRASH_NAMES.contains(&lower.as_str())
        || TRASH_PREFIXES.iter().any(|p| lower.starts_with(p))
    {
        return Classification::Trash;
    }

    if ext.is_some_and(is_media_extension) {
        return Classification::Media;
    }

    Classification::Other
}

pub fn classify(entry: &SourceEntry) -> Classification {
    classify_name(&entry.file_name, entry.extension.as_deref())
}

pub fn is_media_extension(ext: &str) -> bool {
    MEDIA_EXTENSIONS
        .iter()
        .any(|m| m.eq_ignore_ascii_case(ext))
}

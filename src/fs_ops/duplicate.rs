//! Destination collision resolution.
//!
//! Policy for a file of `size` bytes headed to `dir/name`:
//! - name free: place it there.
//! - name taken by a file of the same size: same picture, overwrite.
//! - otherwise: try `stem-1.ext`, `stem-2.ext`, ... and take the first
//!   candidate that is free (or holds a same-size file, which is overwritten).
//!
//! Decisions read state through `FsView` only, so dry runs see the simulated tree.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::trace;

/// What currently occupies a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Absent,
    File(u64),
    /// Directory, symlink or anything that is not a regular file.
    Other,
}

/// Read-only view of the destination tree.
pub trait FsView {
    fn probe(&self, path: &Path) -> Probe;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Nothing at the requested name.
    Free,
    /// Same name, same size.
    Overwrite,
    /// Different file under the requested name; moved under a numbered name.
    Suffixed {
        /// The numbered candidate already holds a same-size file.
        overwrite: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub path: PathBuf,
    pub collision: Collision,
}

impl Placement {
    pub fn overwrites(&self) -> bool {
        matches!(
            self.collision,
            Collision::Overwrite | Collision::Suffixed { overwrite: true }
        )
    }
}

/// Decide where a file of `size` bytes named `name` lands inside `dir`.
pub fn resolve_destination(view: &dyn FsView, dir: &Path, name: &OsStr, size: u64) -> Placement {
    let candidate = dir.join(name);
    match view.probe(&candidate) {
        Probe::Absent => {
            return Placement {
                path: candidate,
                collision: Collision::Free,
            };
        }
        Probe::File(existing) if existing == size => {
            return Placement {
                path: candidate,
                collision: Collision::Overwrite,
            };
        }
        _ => {}
    }

    let (stem, ext) = split_name(name);
    let mut n: u64 = 1;
    loop {
        let path = dir.join(numbered_name(stem, ext, n));
        match view.probe(&path) {
            Probe::Absent => {
                return Placement {
                    path,
                    collision: Collision::Suffixed { overwrite: false },
                };
            }
            Probe::File(existing) if existing == size => {
                return Placement {
                    path,
                    collision: Collision::Suffixed { overwrite: true },
                };
            }
            _ => {}
        }
        if n % 100 == 0 {
            trace!(name = %name.to_string_lossy(), dir = %dir.display(), tries = n, "still searching for a free name");
        }
        n += 1;
    }
}

/// Split at the last dot; a leading dot belongs to the stem.
/// Works on raw names so non-UTF-8 bytes survive.
fn split_name(name: &OsStr) -> (&OsStr, Option<&OsStr>) {
    let p = Path::new(name);
    (p.file_stem().unwrap_or(name), p.extension())
}

fn numbered_name(stem: &OsStr, ext: Option<&OsStr>, n: u64) -> OsString {
    let mut out = stem.to_os_string();
    out.push(format!("-{n}"));
    if let Some(e) = ext {
        out.push(".");
        out.push(e);
    }
    out
}

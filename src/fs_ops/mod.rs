//! Filesystem operations: dry-run aware actions, collision naming and the
//! rename/copy mover underneath them.

mod actions;
mod atomic;
mod duplicate;
mod helpers;
mod util;

pub use actions::{FsActions, PlaceKind};
pub use atomic::relocate_file;
pub use duplicate::{Collision, FsView, Placement, Probe, resolve_destination};
pub use helpers::io_error_with_help;

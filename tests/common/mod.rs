#![allow(dead_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};
use filetime::{FileTime, set_file_mtime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use walkdir::WalkDir;

/// Appends written bytes into a shared in-memory buffer.
#[derive(Clone)]
pub struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a scoped subscriber and return its result plus every event-log line.
pub fn capture_events<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufferWriter(buf.clone())
    };
    let subscriber = registry().with(phorg::logging::event_layer(make_writer));
    let dispatch = tracing::Dispatch::new(subscriber);
    let out = tracing::dispatcher::with_default(&dispatch, f);

    let text = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
    (out, text.lines().map(str::to_string).collect())
}

pub fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Set a file's mtime to local noon on the given day.
pub fn pin_mtime(path: &Path, y: i32, m: u32, d: u32) {
    let local = Local.from_local_datetime(&noon(y, m, d)).unwrap();
    set_file_mtime(path, FileTime::from_unix_time(local.timestamp(), 0)).unwrap();
}

/// Write `size` bytes to `path` (creating parents) with a pinned mtime.
pub fn write_file(path: &Path, size: usize, day: (i32, u32, u32)) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, vec![b'x'; size]).unwrap();
    pin_mtime(path, day.0, day.1, day.2);
}

/// Every path under `root` (relative, sorted), directories with a trailing '/'.
pub fn snapshot(root: &Path) -> Vec<String> {
    if !root.exists() {
        return Vec::new();
    }
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.unwrap())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/");
            if e.file_type().is_dir() { format!("{rel}/") } else { rel }
        })
        .collect()
}

/// Canonical temp root so paths match what validation produces.
pub fn canonical(dir: &Path) -> PathBuf {
    dunce::canonicalize(dir).unwrap()
}

//! Tracing initialization.
//! Two layers share one registry:
//! - the event log: only `phorg::event`, message text alone, one line per
//!   event, to the log file (replaced each run) or stdout;
//! - diagnostics: everything else, filtered by LogLevel, timestamped, to stderr.
//!
//! Implementation notes:
//! - File logging uses tracing_appender::non_blocking; the returned guard must
//!   live until exit so buffered lines are flushed.
//! - If the log file cannot be opened, events fall back to stdout with a warning.

use anyhow::{Result, anyhow};
use chrono::Local;
use std::fmt as stdfmt;
use std::fs;
use std::path::Path;
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, Filtered, Targets};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogLevel;
use crate::events::EVENT_TARGET;
use crate::output as out;

/// Human-friendly timestamp formatter (DD/MM/YY HH:MM:SS)
struct LocalHumanTime;
impl FormatTime for LocalHumanTime {
    fn format_time(&self, w: &mut Writer<'_>) -> stdfmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%d/%m/%y %H:%M:%S"))
    }
}

/// Renders an event as its bare message: no time, level or target.
pub struct EventLine;

impl<S, N> FormatEvent<S, N> for EventLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> stdfmt::Result {
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Fmt layer restricted to `phorg::event`.
pub type EventLayer<S, W> = Filtered<tsfmt::Layer<S, DefaultFields, EventLine, W>, Targets, S>;

/// Layer that writes event-log lines (and nothing else) to `make_writer`.
pub fn event_layer<S, W>(make_writer: W) -> EventLayer<S, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tsfmt::layer()
        .event_format(EventLine)
        .with_ansi(false)
        .with_writer(make_writer)
        .with_filter(Targets::new().with_target(EVENT_TARGET, Level::INFO))
}

/// Filter for the diagnostics layer; event lines are excluded.
pub fn diagnostics_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(format!("{},{}=off", level.directive(), EVENT_TARGET))
}

/// Remove any previous log, then open a fresh non-blocking writer.
fn open_event_log(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    if fs::symlink_metadata(path).is_ok()
        && let Err(e) = fs::remove_file(path)
    {
        eprintln!("Failed to remove previous log file {}: {}", path.display(), e);
        return None;
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        let _ = fs::create_dir_all(parent);
    }

    match fs::File::create(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            None
        }
    }
}

/// Initialize tracing. Returns a WorkerGuard when events go to a file
/// (must be held until shutdown to flush logs).
pub fn init_tracing(level: LogLevel, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let diagnostics = tsfmt::layer()
        .with_timer(LocalHumanTime)
        .with_level(true)
        .with_target(true)
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(diagnostics_filter(level));

    let mut guard = None;
    let mut file_layer = None;
    if let Some(path) = log_file {
        match open_event_log(path) {
            Some((writer, g)) => {
                file_layer = Some(event_layer(writer));
                guard = Some(g);
            }
            None => out::print_warn(&format!(
                "Event log file '{}' could not be opened; writing events to stdout instead.",
                path.display()
            )),
        }
    }
    let stdout_layer = file_layer.is_none().then(|| event_layer(std::io::stdout));

    registry()
        .with(diagnostics)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    Ok(guard)
}

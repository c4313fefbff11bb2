//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the interrupt handler,
//! validates the roots, runs the organizer and writes the summary.

use anyhow::Result;
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use phorg::cli::Args;
use phorg::config::{
    Config, create_template_config, default_config_path, env_config_path, load_config,
    validate_and_normalize,
};
use phorg::logging::init_tracing;
use phorg::output as out;
use phorg::{ExifTimestamp, PhorgError, events, shutdown};

fn print_config_location() {
    if let Some(p) = env_config_path() {
        out::print_info(&format!("Using PHORG_CONFIG (explicit):\n  {}\n", p.display()));
        out::print_info("To override, unset PHORG_CONFIG or set it to another file.");
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default phorg config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run with --init-config to create a template.");
            }
        }
        None => out::print_error("Could not determine a default config path."),
    }
}

fn init_config() -> Result<()> {
    let path = env_config_path()
        .or_else(default_config_path)
        .ok_or_else(|| anyhow::anyhow!("could not determine a config path; set PHORG_CONFIG"))?;
    create_template_config(&path)?;
    out::print_success(&format!("A template phorg config was written to: {}", path.display()));
    out::print_info("Edit it to set `source` and `target`, then run phorg without arguments.");
    Ok(())
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Both exit before logging is set up
    if args.print_config {
        print_config_location();
        return Ok(());
    }
    if args.init_config {
        return init_config();
    }

    // File values first, then CLI overrides
    let mut cfg = match load_config()? {
        Some((_, file_cfg)) => file_cfg,
        None => Config::default(),
    };
    args.apply_overrides(&mut cfg)?;

    let guard = init_tracing(cfg.log_level, cfg.log_file.as_deref()).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Guard is dropped on interrupt too so buffered event lines reach the file
    let guard_slot = Arc::new(Mutex::new(guard));
    {
        let guard_slot = Arc::clone(&guard_slot);
        if let Err(e) = ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; stopping after the current entry...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        }) {
            out::print_warn(&format!("Could not install interrupt handler: {e}"));
        }
    }

    debug!(?args, "starting phorg");

    let result = (|| -> Result<()> {
        validate_and_normalize(&mut cfg)?;
        let stats = phorg::run(&cfg, &ExifTimestamp)?;
        for line in stats.summary_lines() {
            events::emit_line(&line);
        }
        Ok(())
    })();

    if let Err(e) = &result {
        match e.downcast_ref::<PhorgError>() {
            Some(pe @ PhorgError::Interrupted) => {
                error!(code = pe.code(), kind = "interrupted", "Run aborted by user")
            }
            Some(pe) => error!(code = pe.code(), error = %pe, "Run refused"),
            None => error!(error = ?e, "Run failed"),
        }
    }

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}

//! Start Menu Programs Shortcut Maker.
//!
//! Run it once to add a "Start Menu - Programs (create shortcut)" entry to
//! the "send to" menu; the entry then calls it with the selected items.
#![cfg_attr(windows, windows_subsystem = "windows")]

use anyhow::{Context, Result};
use clap::Parser;
use shortcut_maker_core::{
    platform_link_writer, platform_notifier, App, AppConfig, SystemPathResolver,
};
use std::ffi::OsString;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "shortcut-maker")]
#[command(about = "Creates Start Menu Programs shortcuts from the 'Send to' menu")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Files or folders to create shortcuts for (none = install into "Send to")
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    paths: Vec<OsString>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(AppConfig::DEFAULT_LOG_FILTER));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting {} on {}", AppConfig::APP_NAME, std::env::consts::OS);

    let current_exe = std::env::current_exe().context("Could not locate the running executable")?;
    debug!("Running from {}", current_exe.display());

    let app = App::new(
        SystemPathResolver,
        platform_link_writer(),
        platform_notifier(),
        current_exe,
    );
    let outcome = app.run(&args.paths);
    debug!("Finished: {:?}", outcome);

    Ok(())
}

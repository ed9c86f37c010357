// src/bin/stagehand.rs

//! The `stagehand` command-line entry point.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use stagehand::{
    cli::{Cli, dispatcher},
    core::{cache::StalenessCache, config_loader, lifecycle::Lifecycle, toolchain},
    system::{executor::SystemRunner, host::HostProfile},
};
use std::{env, io::Write};

/// The main entry point of `stagehand`.
/// It sets up logging, parses arguments, runs the requested command and
/// performs centralized error handling.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(Cli::parse()) {
        // Every failure ends here as a single line; nothing is retried.
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Resolves configuration and the toolchain once, then hands the invocation
/// to the dispatcher.
fn run(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let base_dir = env::current_dir().context("Could not determine the current directory")?;
    let mut settings = config_loader::load_settings(&base_dir, cli.config.as_deref())?;
    if let Some(folder) = &cli.folder {
        settings.folder = folder.clone();
    }

    let host = HostProfile::detect();
    let runner = SystemRunner::new(host);
    let toolchain = toolchain::detect_toolchain(&runner, host, &settings.toolchain);
    let cache = StalenessCache::new(&settings.cache_dir);
    let lifecycle = Lifecycle::new(&runner, &toolchain, &cache, &settings);

    dispatcher::dispatch(&cli.invocation(), &lifecycle, &settings.folder)?;
    Ok(())
}

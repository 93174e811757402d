//! Inventory Watch - used-vehicle inventory change notifier
//!
//! Polls the inventory endpoint, compares the result with the snapshot from
//! the previous run and posts new and changed listings to Discord.

use crate::config::{Args, Config};
use crate::cycle::run_cycle;
use crate::errors::TrackerError;
use crate::inventory::InventoryClient;
use crate::notify::{DiscordNotifier, LogNotifier, Notifier};
use crate::store::open_store;
use clap::Parser;
use std::process::ExitCode;

mod config;
mod cycle;
mod db;
mod domain;
mod errors;
mod inventory;
mod notify;
mod store;

#[cfg(test)]
mod tests;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::try_from(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs one cycle, or cycles back to back when an interval is configured.
/// Returns whether the (last) cycle completed cleanly.
fn run(config: Config) -> Result<bool, TrackerError> {
    log::info!("Snapshot store: {} ({:?})", config.store_path.display(), config.backend);

    let source = InventoryClient::new(config.inventory.clone())?;
    let mut store = open_store(config.backend, &config.store_path)?;
    let notifier: Box<dyn Notifier> = match &config.discord {
        Some(discord) => Box::new(DiscordNotifier::new(discord.clone(), config.timeout)?),
        None => {
            log::info!("Dry run, notifications will only be logged");
            Box::new(LogNotifier::new(config.currency_symbol.clone()))
        }
    };

    let Some(interval) = config.interval else {
        let report = run_cycle(&source, store.as_mut(), notifier.as_ref())?;
        log::info!("Cycle finished: {report:?}");
        return Ok(report.failed_deliveries == 0);
    };

    log::info!("Watching, next cycle {}s after each one ends", interval.as_secs());
    loop {
        match run_cycle(&source, store.as_mut(), notifier.as_ref()) {
            Ok(report) => log::info!("Cycle finished: {report:?}"),
            Err(e) => log::error!("Cycle failed: {e}"),
        }
        std::thread::sleep(interval);
    }
}

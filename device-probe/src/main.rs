// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use std::env;

use log::{info, warn};
use miette::IntoDiagnostic;

use executor::{new_executor, Config, Executor};

/// Loads the configuration named on the command line, or the defaults
fn load_config() -> miette::Result<Config> {
    match env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {path}");
            Ok(Config::from_path(path)?)
        }
        None => Ok(Config::default()),
    }
}

/// Reports the locally attached SCSI disks and the next free device slot
fn main() -> miette::Result<()> {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    let config = load_config()?;
    let executor = new_executor(config);

    if !executor.supported()? {
        warn!("{} executor is not supported on this host", executor.name());
    }

    match executor.instance_id() {
        Ok(id) => info!("Instance: {} ({})", id.id, id.driver),
        Err(e) => warn!("Instance id unavailable: {e}"),
    }

    let devices = executor.local_devices()?;
    println!("{}", serde_json::to_string_pretty(&devices).into_diagnostic()?);

    match executor.next_device() {
        Ok(device) => println!("next device: {device}"),
        Err(e) if e.is_exhausted() => println!("next device: none, all slots taken"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

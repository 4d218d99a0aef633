// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

use devices::{CommandRunner, LocalDevices, SystemRunner};
use log::{debug, error, info};

use crate::{Config, Error, Executor, InstanceId, Platform, StaticPlatform};

/// Executor for SCSI disks enumerated with `lsscsi`
///
/// Holds no state between calls: every query enumerates the attached devices afresh.
#[derive(Debug)]
pub struct Driver<R = SystemRunner, P = StaticPlatform> {
    config: Config,
    runner: R,
    platform: P,
}

impl Driver {
    /// Create a driver that spawns real processes and takes its identity from `config`
    pub fn new(config: Config) -> Self {
        let platform = StaticPlatform::from_config(&config);
        Self::with_runner(config, SystemRunner, platform)
    }
}

impl<R, P> Driver<R, P>
where
    R: CommandRunner,
    P: Platform,
{
    /// Create a driver with explicit collaborators
    pub fn with_runner(config: Config, runner: R, platform: P) -> Self {
        info!("Creating {} executor (lsscsi: {})", config.name, config.lsscsi);
        Self {
            config,
            runner,
            platform,
        }
    }

    /// The configuration this driver was created with
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<R, P> Executor for Driver<R, P>
where
    R: CommandRunner,
    P: Platform,
{
    fn name(&self) -> &str {
        &self.config.name
    }

    fn supported(&self) -> Result<bool, Error> {
        if let Err(e) = which::which(&self.config.lsscsi) {
            error!("{} executable not found in PATH: {e}", self.config.lsscsi);
            return Ok(false);
        }

        self.platform.is_supported()
    }

    fn instance_id(&self) -> Result<InstanceId, Error> {
        Ok(InstanceId {
            id: self.platform.instance_id()?,
            driver: self.name().to_owned(),
        })
    }

    fn local_devices(&self) -> Result<LocalDevices, Error> {
        Ok(LocalDevices::discover(
            self.name(),
            &self.runner,
            &self.config.lsscsi,
        )?)
    }

    fn next_device(&self) -> Result<String, Error> {
        let device = self.local_devices()?.next_device()?;
        debug!("next available device: {device}");
        Ok(device)
    }
}

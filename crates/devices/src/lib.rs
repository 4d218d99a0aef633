// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Attached SCSI disk discovery and device slot allocation
//!
//! Devices are read from `lsscsi` output rather than sysfs, so that every `/dev/sd*` node
//! comes with the SCSI address it sits at. Only the logical unit number of that address is kept.

use std::{collections::HashMap, fmt, io};

use log::debug;
use serde::Serialize;
use thiserror::Error;

pub mod lsscsi;
pub mod mock;
pub mod runner;
pub mod slot;

pub use runner::{CommandRunner, SystemRunner};
pub use slot::next_device;

/// Mapping of device path (e.g. `/dev/sdc`) to the logical unit number it is attached at
pub type DeviceMap = HashMap<String, String>;

/// Failure to run an external command
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The command could not be started at all
    #[error("failed to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The command ran but did not exit successfully
    #[error("{command} failed: {stderr}")]
    Failed {
        command: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Diagnostic text written to the error stream
        stderr: String,
    },
}

/// Errors that can occur while enumerating or allocating devices
#[derive(Debug, Error)]
pub enum Error {
    /// The listing utility could not be run
    #[error("unable to get scsi devices: {0}")]
    Execution(#[from] ExecutionError),

    /// Every device slot is already taken
    #[error("no available device")]
    NoAvailableDevice,
}

impl Error {
    /// Returns true if allocation failed because no slot was left
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Error::NoAvailableDevice)
    }
}

/// The locally visible devices of a single driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalDevices {
    /// Name of the driver that produced this record
    pub driver: String,

    /// Attached devices, absent when nothing matched
    #[serde(rename = "deviceMap", skip_serializing_if = "Option::is_none")]
    pub device_map: Option<DeviceMap>,
}

impl LocalDevices {
    /// Builds a record for `driver`, dropping the map entirely if it is empty
    pub fn new(driver: impl Into<String>, device_map: DeviceMap) -> Self {
        Self {
            driver: driver.into(),
            device_map: (!device_map.is_empty()).then_some(device_map),
        }
    }

    /// Runs the listing utility once and collects the attached devices.
    ///
    /// # Arguments
    ///
    /// * `driver` - Name recorded in the result
    /// * `runner` - Used to invoke the listing utility
    /// * `command` - The listing utility to invoke, usually [`lsscsi::COMMAND`]
    ///
    /// # Returns
    ///
    /// The device record, or [`Error::Execution`] if the utility could not be run.
    pub fn discover<R>(driver: impl Into<String>, runner: &R, command: &str) -> Result<Self, Error>
    where
        R: CommandRunner + ?Sized,
    {
        let output = lsscsi::list(runner, command)?;
        let devices = Self::new(driver, lsscsi::parse(&output));
        debug!("local devices: {devices}");
        Ok(devices)
    }

    /// Returns the logical unit number of `device` if it is attached
    pub fn lun(&self, device: &str) -> Option<&str> {
        self.device_map.as_ref()?.get(device).map(String::as_str)
    }

    /// Picks the next free device slot given the devices in this record
    pub fn next_device(&self) -> Result<String, Error> {
        next_device(self.device_map.as_ref())
    }
}

impl fmt::Display for LocalDevices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.driver)?;

        let Some(map) = &self.device_map else {
            return Ok(());
        };

        // Sorted so that log lines are stable between calls
        let mut entries = map.iter().collect::<Vec<_>>();
        entries.sort();
        for (n, (device, lun)) in entries.into_iter().enumerate() {
            if n > 0 {
                f.write_str(",")?;
            }
            write!(f, "{device}::{lun}")?;
        }

        Ok(())
    }
}

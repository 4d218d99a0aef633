// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Storage executor for unmanaged disks attached to a cloud instance
//!
//! The executor runs on the instance itself. It reports which SCSI disks are attached
//! locally and picks the device path the next volume should be attached at.

use serde::Serialize;

pub use devices::{DeviceMap, LocalDevices};

mod config;
pub use config::Config;

mod driver;
pub use driver::Driver;

mod errors;
pub use errors::*;

mod platform;
pub use platform::{Platform, StaticPlatform};

/// Default driver name
pub const NAME: &str = "azureud";

/// Identity of the instance an executor runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceId {
    /// Platform specific instance identifier
    pub id: String,

    /// Name of the driver that produced the identifier
    pub driver: String,
}

/// Queries a storage executor answers about its host
pub trait Executor {
    /// The driver name
    fn name(&self) -> &str;

    /// Returns true if this executor can run on the current host
    fn supported(&self) -> Result<bool, Error>;

    /// Identifies the instance the executor runs on
    fn instance_id(&self) -> Result<InstanceId, Error>;

    /// Lists the devices currently attached to this instance
    fn local_devices(&self) -> Result<LocalDevices, Error>;

    /// Returns the device path the next volume should be attached at
    fn next_device(&self) -> Result<String, Error>;
}

/// Creates an executor that runs the real listing utility on this host
pub fn new_executor(config: Config) -> impl Executor {
    Driver::new(config)
}

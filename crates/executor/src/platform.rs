// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Host platform collaborators
//!
//! Deciding whether the host is a suitable cloud instance, and which instance it is, lives
//! outside this crate. A [`Platform`] answers both questions for the driver.

use crate::{Config, Error};

/// Answers questions about the instance the executor runs on
pub trait Platform {
    /// Returns true if the host is an instance this driver can manage
    fn is_supported(&self) -> Result<bool, Error>;

    /// Returns the identifier of this instance
    fn instance_id(&self) -> Result<String, Error>;
}

/// A platform whose identity is known ahead of time
///
/// The host is treated as supported exactly when an instance id is known.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StaticPlatform {
    instance_id: Option<String>,
}

impl StaticPlatform {
    pub fn new(instance_id: Option<String>) -> Self {
        Self { instance_id }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.instance_id.clone())
    }
}

impl Platform for StaticPlatform {
    fn is_supported(&self) -> Result<bool, Error> {
        Ok(self.instance_id.is_some())
    }

    fn instance_id(&self) -> Result<String, Error> {
        self.instance_id.clone().ok_or(Error::MissingInstanceId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_static_platform() {
        let known = StaticPlatform::new(Some("vm-0001".to_owned()));
        assert!(known.is_supported().unwrap());
        assert_eq!(known.instance_id().unwrap(), "vm-0001");

        let unknown = StaticPlatform::default();
        assert!(!unknown.is_supported().unwrap());
        assert!(matches!(unknown.instance_id(), Err(Error::MissingInstanceId)));
    }
}

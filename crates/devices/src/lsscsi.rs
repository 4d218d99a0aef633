// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! `lsscsi` invocation and output parsing
//!
//! Each line of output describes one SCSI device:
//!
//! ```text
//! [3:0:0:1]    disk    Msft     Virtual Disk     1.0   /dev/sdd
//! ```
//!
//! Only the first token (the `[host:channel:target:lun]` address) and the last token (the device
//! node) are used. Lines where either does not look right are skipped without complaint, since
//! optical drives, tapes and other non-disk devices show up in the same listing.

use std::sync::OnceLock;

use log::trace;
use regex::Regex;

use crate::{
    slot::{DEVICE_PREFIX, FIRST_LETTER, LAST_LETTER},
    CommandRunner, DeviceMap, ExecutionError,
};

/// Default name of the listing utility
pub const COMMAND: &str = "lsscsi";

/// Matches allocatable device nodes, e.g. /dev/sdc
static DEVICE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Matches a SCSI address and captures its logical unit number
static ADDRESS_PATTERN: OnceLock<Regex> = OnceLock::new();

fn device_pattern() -> &'static Regex {
    DEVICE_PATTERN.get_or_init(|| {
        let pattern = format!("^{}[{FIRST_LETTER}-{LAST_LETTER}]$", regex::escape(DEVICE_PREFIX));
        Regex::new(&pattern).expect("Failed to initialise known-working regex")
    })
}

fn address_pattern() -> &'static Regex {
    ADDRESS_PATTERN.get_or_init(|| {
        Regex::new(r"^\[[0-9]+:[0-9]+:[0-9]+:([0-9]+)\]$").expect("Failed to initialise known-working regex")
    })
}

/// Runs the listing utility once and returns its raw output
pub fn list<R>(runner: &R, command: &str) -> Result<Vec<u8>, ExecutionError>
where
    R: CommandRunner + ?Sized,
{
    runner.run(command, &[])
}

/// Extracts the device path and logical unit number from a single listing line
///
/// # Returns
///
/// * `Some((device, lun))` if the line describes an allocatable disk
/// * `None` if the line should be skipped
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let mut fields = line.split_whitespace();
    let address = fields.next()?;
    let device = fields.last().unwrap_or(address);

    if !device_pattern().is_match(device) {
        trace!("skipping {device:?}: not an allocatable device");
        return None;
    }

    let Some(captures) = address_pattern().captures(address) else {
        trace!("skipping {device}: unrecognised scsi address {address:?}");
        return None;
    };

    Some((device, captures.get(1)?.as_str()))
}

/// Builds a device map from raw listing output
///
/// Later lines win when the same device appears more than once.
pub fn parse(output: &[u8]) -> DeviceMap {
    String::from_utf8_lossy(output)
        .lines()
        .filter_map(parse_line)
        .map(|(device, lun)| (device.to_owned(), lun.to_owned()))
        .collect()
}

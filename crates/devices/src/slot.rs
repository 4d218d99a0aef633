// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Device slot allocation
//!
//! Volumes attach to `/dev/sdc` through `/dev/sdz`. `sda` and `sdb` belong to the OS and resource
//! disks and are never handed out.

use std::collections::BTreeSet;

use crate::{DeviceMap, Error};

/// Prefix shared by every allocatable device path
pub const DEVICE_PREFIX: &str = "/dev/sd";

/// First allocatable device letter
pub const FIRST_LETTER: char = 'c';

/// Last allocatable device letter
pub const LAST_LETTER: char = 'z';

/// The device letters in allocation order
pub fn letters() -> impl Iterator<Item = char> + Clone {
    FIRST_LETTER..=LAST_LETTER
}

/// Full device path for `letter`
pub fn device_path(letter: char) -> String {
    format!("{DEVICE_PREFIX}{letter}")
}

/// Returns the slot letter of `path` if it is an allocatable device path
pub fn slot_letter(path: &str) -> Option<char> {
    let mut rest = path.strip_prefix(DEVICE_PREFIX)?.chars();
    match (rest.next(), rest.next()) {
        (Some(letter), None) if (FIRST_LETTER..=LAST_LETTER).contains(&letter) => Some(letter),
        _ => None,
    }
}

/// Finds the first device path not claimed by `devices`.
///
/// Only the set of claimed letters matters, so the result is the same however the map
/// happens to iterate.
///
/// # Returns
///
/// The device path, or [`Error::NoAvailableDevice`] once `c` through `z` are all taken.
pub fn next_device(devices: Option<&DeviceMap>) -> Result<String, Error> {
    let claimed = devices
        .into_iter()
        .flat_map(|map| map.keys())
        .filter_map(|path| slot_letter(path))
        .collect::<BTreeSet<_>>();

    letters()
        .find(|letter| !claimed.contains(letter))
        .map(device_path)
        .ok_or(Error::NoAvailableDevice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn claimed(letters: impl IntoIterator<Item = char>) -> DeviceMap {
        letters
            .into_iter()
            .enumerate()
            .map(|(lun, letter)| (device_path(letter), lun.to_string()))
            .collect()
    }

    #[test]
    fn test_letters() {
        let all = letters().collect::<String>();
        assert_eq!(all, "cdefghijklmnopqrstuvwxyz");
        assert_eq!(all.len(), 24);
    }

    #[test]
    fn test_slot_letter() {
        assert_eq!(slot_letter("/dev/sdc"), Some('c'));
        assert_eq!(slot_letter("/dev/sdz"), Some('z'));
        assert_eq!(slot_letter("/dev/sda"), None);
        assert_eq!(slot_letter("/dev/sdb"), None);
        assert_eq!(slot_letter("/dev/sdcc"), None);
        assert_eq!(slot_letter("/dev/sdC"), None);
        assert_eq!(slot_letter("/dev/sd"), None);
        assert_eq!(slot_letter("/dev/xvdc"), None);
    }

    #[test]
    fn test_empty() {
        assert_eq!(next_device(None).unwrap(), "/dev/sdc");
        assert_eq!(next_device(Some(&DeviceMap::new())).unwrap(), "/dev/sdc");
    }

    #[test]
    fn test_first_taken() {
        let map = DeviceMap::from([("/dev/sdc".to_owned(), "0".to_owned())]);
        assert_eq!(next_device(Some(&map)).unwrap(), "/dev/sdd");
    }

    #[test]
    fn test_gap_filled_first() {
        let map = claimed(['c', 'd', 'f', 'g']);
        assert_eq!(next_device(Some(&map)).unwrap(), "/dev/sde");
    }

    #[test]
    fn test_reserved_letters_ignored() {
        let mut map = claimed(['c']);
        map.insert("/dev/sda".into(), "0".into());
        map.insert("/dev/sdb".into(), "1".into());
        assert_eq!(next_device(Some(&map)).unwrap(), "/dev/sdd");
    }

    #[test]
    fn test_exhausted() {
        let map = claimed(letters());
        let err = next_device(Some(&map)).unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(err.to_string(), "no available device");
    }

    #[test]
    fn test_last_slot() {
        let map = claimed(letters().filter(|l| *l != 'z'));
        assert_eq!(next_device(Some(&map)).unwrap(), "/dev/sdz");
    }

    #[test]
    fn test_order_independent() {
        let forward = claimed(['c', 'd', 'e', 'h']);
        let reverse = claimed(['h', 'e', 'd', 'c']);
        assert_eq!(
            forward.keys().collect::<BTreeSet<_>>(),
            reverse.keys().collect::<BTreeSet<_>>()
        );
        assert_eq!(next_device(Some(&forward)).unwrap(), "/dev/sdf");
        assert_eq!(next_device(Some(&forward)).unwrap(), next_device(Some(&reverse)).unwrap());
    }
}

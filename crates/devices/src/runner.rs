// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Execution of external commands
//!
//! Parsing and allocation never spawn processes themselves, they go through a [`CommandRunner`]
//! so they can be exercised against canned output.

use std::process::Command;

use log::error;

use crate::ExecutionError;

/// Runs a named command and captures its standard output
pub trait CommandRunner {
    /// Runs `program` with `args`, blocking until it exits.
    ///
    /// # Returns
    ///
    /// The raw standard output on success, or an [`ExecutionError`] carrying the launch error or
    /// whatever the command wrote to its error stream.
    fn run(&self, program: &str, args: &[&str]) -> Result<Vec<u8>, ExecutionError>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[&str]) -> Result<Vec<u8>, ExecutionError> {
        (**self).run(program, args)
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for Box<T> {
    fn run(&self, program: &str, args: &[&str]) -> Result<Vec<u8>, ExecutionError> {
        (**self).run(program, args)
    }
}

/// Spawns real processes on the host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<Vec<u8>, ExecutionError> {
        let output = Command::new(program).args(args).output().map_err(|source| {
            error!("Unable to launch {program}: {source}");
            ExecutionError::Launch {
                command: program.to_owned(),
                source,
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            error!("{program} exited with {}: {stderr}", output.status);
            return Err(ExecutionError::Failed {
                command: program.to_owned(),
                code: output.status.code(),
                stderr,
            });
        }

        Ok(output.stdout)
    }
}

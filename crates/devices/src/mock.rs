// SPDX-FileCopyrightText: Copyright © 2025 Serpent OS Developers
//
// SPDX-License-Identifier: MPL-2.0

//! Mock command runner for testing.
//!
//! This module provides a runner with canned behaviour that can be used for testing
//! device discovery without spawning `lsscsi` or having any SCSI hardware.

use std::{
    io,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{CommandRunner, ExecutionError};

#[derive(Debug, Clone)]
enum Response {
    Stdout(Vec<u8>),
    Failure { code: i32, stderr: String },
    Missing,
}

/// A runner that replays a fixed response for every invocation
#[derive(Debug)]
pub struct MockRunner {
    response: Response,
    calls: AtomicUsize,
}

impl MockRunner {
    fn new(response: Response) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a runner whose command succeeds with `stdout`
    pub fn with_output(stdout: impl Into<Vec<u8>>) -> Self {
        Self::new(Response::Stdout(stdout.into()))
    }

    /// Creates a runner whose command exits with `code`, writing `stderr`
    pub fn failing(code: i32, stderr: impl Into<String>) -> Self {
        Self::new(Response::Failure {
            code,
            stderr: stderr.into(),
        })
    }

    /// Creates a runner whose command cannot be found
    pub fn missing() -> Self {
        Self::new(Response::Missing)
    }

    /// Number of times a command has been run
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, _args: &[&str]) -> Result<Vec<u8>, ExecutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.response {
            Response::Stdout(stdout) => Ok(stdout.clone()),
            Response::Failure { code, stderr } => Err(ExecutionError::Failed {
                command: program.to_owned(),
                code: Some(*code),
                stderr: stderr.clone(),
            }),
            Response::Missing => Err(ExecutionError::Launch {
                command: program.to_owned(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
        }
    }
}

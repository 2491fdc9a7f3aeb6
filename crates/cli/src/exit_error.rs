// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors that carry a process exit code.
//!
//! Commands return `ExitError` through `anyhow` instead of exiting directly;
//! `main()` picks the code back out.

use std::fmt;

use knob_client::ChannelError;

/// Generic failure.
pub const FAILURE: i32 = 1;
/// The requested property does not exist.
pub const NOT_FOUND: i32 = 2;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}

/// Lift a channel error into the command layer, tagging not-found with its
/// own exit code.
pub fn channel_error(e: ChannelError) -> anyhow::Error {
    match e {
        ChannelError::NotFound { property } => {
            ExitError::new(NOT_FOUND, format!("no such property: {property}")).into()
        }
        other => other.into(),
    }
}

/// Exit code for an error bubbling out of a command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ExitError>().map_or(FAILURE, |e| e.code)
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;

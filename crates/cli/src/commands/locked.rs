// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `knob locked`

use std::io::Write;

use anyhow::Result;
use clap::Args;
use knob_client::Registry;

use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct LockedArgs {
    /// Channel name
    pub channel: String,
    /// Property path
    pub property: String,
}

/// Prints `true` or `false`. A failed lock query prints `false`.
pub fn handle(
    args: LockedArgs,
    registry: &Registry,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let locked = registry.create(&args.channel).is_locked(&args.property);
    match format {
        OutputFormat::Text => writeln!(out, "{locked}")?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::json!({ "locked": locked }))?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "locked_tests.rs"]
mod tests;

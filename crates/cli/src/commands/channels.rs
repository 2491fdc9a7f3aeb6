// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `knob channels`

use std::io::Write;

use anyhow::Result;
use knob_client::Registry;

use crate::exit_error::channel_error;
use crate::output::OutputFormat;

pub fn handle(registry: &Registry, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let channels = registry.list_channels().map_err(channel_error)?;
    match format {
        OutputFormat::Text => {
            for name in &channels {
                writeln!(out, "{name}")?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&channels)?)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "channels_tests.rs"]
mod tests;

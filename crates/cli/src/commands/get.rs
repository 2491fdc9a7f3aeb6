// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `knob get`

use std::io::Write;

use anyhow::Result;
use clap::Args;
use knob_client::Registry;
use knob_core::Kind;

use crate::exit_error::channel_error;
use crate::output::{format_value, OutputFormat};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Channel name
    pub channel: String,
    /// Property path, e.g. /apps/editor/font-size
    pub property: String,
    /// Convert to this kind instead of the stored one
    #[arg(long = "type", value_name = "KIND")]
    pub kind: Option<Kind>,
}

pub fn handle(
    args: GetArgs,
    registry: &Registry,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let channel = registry.create(&args.channel);
    let value = channel.get(&args.property, args.kind).map_err(channel_error)?;
    writeln!(out, "{}", format_value(&value, format))?;
    Ok(())
}

#[cfg(test)]
#[path = "get_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `knob list`

use std::io::Write;

use anyhow::Result;
use clap::Args;
use knob_client::Registry;
use serde_json::{json, Map};

use crate::color;
use crate::exit_error::channel_error;
use crate::output::{value_json, OutputFormat};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Channel name
    pub channel: String,
    /// Only properties at or under this path
    #[arg(default_value = "/")]
    pub base: String,
    /// Show each value's kind and lock state
    #[arg(long, short)]
    pub verbose: bool,
}

pub fn handle(
    args: ListArgs,
    registry: &Registry,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let channel = registry.create(&args.channel);
    let properties = channel.get_all(&args.base).map_err(channel_error)?;

    match format {
        OutputFormat::Text => {
            for (path, value) in &properties {
                if args.verbose {
                    let lock = if channel.is_locked(path) {
                        color::muted(" [locked]")
                    } else {
                        String::new()
                    };
                    writeln!(
                        out,
                        "{} {} = {value}{lock}",
                        color::path(path),
                        color::kind(&format!("({})", value.kind()))
                    )?;
                } else {
                    writeln!(out, "{} = {value}", color::path(path))?;
                }
            }
        }
        OutputFormat::Json => {
            let mut object = Map::new();
            for (path, value) in &properties {
                let entry = if args.verbose {
                    json!({
                        "type": value.kind().name(),
                        "value": value_json(value),
                        "locked": channel.is_locked(path),
                    })
                } else {
                    value_json(value)
                };
                object.insert(path.clone(), entry);
            }
            writeln!(out, "{}", serde_json::Value::Object(object))?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `knob set`

use anyhow::{bail, Result};
use clap::Args;
use knob_client::{Channel, ChannelError, Registry};
use knob_core::Kind;

use crate::exit_error::channel_error;
use crate::value_arg::{parse_elements, parse_value};

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Channel name
    pub channel: String,
    /// Property path
    pub property: String,
    /// New value (omit with --array)
    #[arg(required_unless_present = "array", conflicts_with = "array")]
    pub value: Option<String>,
    /// Value kind; defaults to the stored kind, or string for new properties.
    /// Repeat with --array to type each element.
    #[arg(long = "type", value_name = "KIND")]
    pub kinds: Vec<Kind>,
    /// Store a value array built from repeated --value
    #[arg(long, requires = "values")]
    pub array: bool,
    /// Array element (with --array)
    #[arg(long = "value", value_name = "VALUE", requires = "array")]
    pub values: Vec<String>,
}

pub fn handle(args: SetArgs, registry: &Registry) -> Result<()> {
    let channel = registry.create(&args.channel);
    if args.array {
        let elements = parse_elements(&args.values, &args.kinds)?;
        return channel.set_array(&args.property, elements).map_err(channel_error);
    }

    let raw = args.value.unwrap_or_default();
    let kind = match args.kinds.as_slice() {
        [] => stored_kind(&channel, &args.property)?,
        [kind] => *kind,
        _ => bail!("only one --type is allowed without --array"),
    };
    let value = parse_value(&raw, kind)?;
    channel.set(&args.property, value).map_err(channel_error)
}

/// Kind of the value currently stored at `property`, or string if unset.
fn stored_kind(channel: &Channel, property: &str) -> Result<Kind> {
    match channel.get(property, None) {
        Ok(value) if value.kind() == Kind::Array => {
            bail!("{property} holds an array; use --array")
        }
        Ok(value) => Ok(value.kind()),
        Err(ChannelError::NotFound { .. }) => Ok(Kind::String),
        Err(e) => Err(channel_error(e)),
    }
}

#[cfg(test)]
#[path = "set_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `knob reset`

use anyhow::Result;
use clap::Args;
use knob_client::Registry;

use crate::exit_error::channel_error;

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Channel name
    pub channel: String,
    /// Property path, or / for the whole channel (needs --recursive)
    pub property: String,
    /// Also remove everything under the path
    #[arg(long, short)]
    pub recursive: bool,
}

pub fn handle(args: ResetArgs, registry: &Registry) -> Result<()> {
    registry
        .create(&args.channel)
        .reset(&args.property, args.recursive)
        .map_err(channel_error)
}

#[cfg(test)]
#[path = "reset_tests.rs"]
mod tests;

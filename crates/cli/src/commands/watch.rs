// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `knob watch`

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use knob_client::{Channel, PropertyChange, Registry};
use parking_lot::Mutex;
use serde_json::json;
use tracing::warn;

use crate::color;
use crate::exit_error::channel_error;
use crate::output::{format_value, value_json, OutputFormat};

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Channel name
    pub channel: String,
    /// Only report changes under this path; paths print relative to it
    #[arg(long)]
    pub base: Option<String>,
    /// Only report this property (relative to --base)
    #[arg(long)]
    pub property: Option<String>,
}

/// Print changes until the daemon closes the stream.
pub fn handle(args: WatchArgs, registry: &Registry, format: OutputFormat) -> Result<()> {
    let _channel = subscribe(&args, registry, format, Arc::new(Mutex::new(std::io::stdout())));
    registry.watch().map_err(channel_error)?;
    registry.run_dispatch().map_err(channel_error)
}

/// Create the watched channel with a listener that writes each change to
/// `out`. The listener lives as long as the returned channel.
pub fn subscribe<W>(
    args: &WatchArgs,
    registry: &Registry,
    format: OutputFormat,
    out: Arc<Mutex<W>>,
) -> Arc<Channel>
where
    W: Write + Send + 'static,
{
    let channel = registry.create_with_base(&args.channel, args.base.as_deref());
    channel.connect(args.property.as_deref(), move |change| {
        let line = render_change(change, format);
        let mut out = out.lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(error = %e, "failed to write change");
        }
    });
    channel
}

pub fn render_change(change: &PropertyChange, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => match &change.value {
            Some(value) => {
                format!("{} = {}", color::path(&change.property), format_value(value, format))
            }
            None => format!("{} {}", color::path(&change.property), color::muted("(unset)")),
        },
        OutputFormat::Json => json!({
            "channel": change.channel,
            "property": change.property,
            "value": change.value.as_ref().map(value_json),
        })
        .to_string(),
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;

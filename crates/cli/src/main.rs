// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! knob: query and modify configuration channels

mod color;
mod commands;
mod exit_error;
mod output;
mod value_arg;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use knob_adapters::{env, SocketTransport};
use knob_client::Registry;
use tracing_subscriber::EnvFilter;

use commands::{channels, get, list, locked, reset, set, watch};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "knob", version, about = "Query and modify knob configuration channels")]
#[command(styles = color::styles())]
struct Cli {
    /// Daemon socket (default: $KNOB_SOCKET, then the runtime directory)
    #[arg(long, global = true, value_name = "PATH")]
    socket: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value_t)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List channels that hold properties
    Channels,
    /// Print a property's value
    Get(get::GetArgs),
    /// Write a property
    Set(set::SetArgs),
    /// Remove a property or subtree
    Reset(reset::ResetArgs),
    /// Print every property under a path
    List(list::ListArgs),
    /// Report whether policy locks a property
    Locked(locked::LockedArgs),
    /// Print changes as they happen
    Watch(watch::WatchArgs),
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("KNOB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn connect(socket: Option<PathBuf>) -> Result<Arc<Registry>> {
    let transport = match socket {
        Some(path) => SocketTransport::new(path, env::ipc_timeout())?,
        None => SocketTransport::from_env()?,
    };
    Ok(Registry::new(Arc::new(transport)))
}

fn run(cli: Cli) -> Result<()> {
    let registry = connect(cli.socket)?;
    let format = cli.output;
    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Channels => channels::handle(&registry, format, &mut stdout),
        Command::Get(args) => get::handle(args, &registry, format, &mut stdout),
        Command::Set(args) => set::handle(args, &registry),
        Command::Reset(args) => reset::handle(args, &registry),
        Command::List(args) => list::handle(args, &registry, format, &mut stdout),
        Command::Locked(args) => locked::handle(args, &registry, format, &mut stdout),
        Command::Watch(args) => {
            drop(stdout);
            watch::handle(args, &registry, format)
        }
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(exit_error::exit_code(&e));
    }
}

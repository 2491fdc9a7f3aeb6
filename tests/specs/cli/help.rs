// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn knob_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("get")
        .stdout_has("set")
        .stdout_has("watch");
}

#[test]
fn knob_set_help_mentions_array() {
    cli().args(&["set", "--help"]).passes().stdout_has("--array");
}

#[test]
fn knob_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn knob_without_command_is_a_usage_error() {
    cli().exits(2).stderr_has("Usage:");
}

#[test]
fn unreachable_daemon_fails_with_socket_path() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("absent.sock");
    cli()
        .env("KNOB_SOCKET", &socket)
        .args(&["channels"])
        .exits(1)
        .stderr_has("absent.sock");
}

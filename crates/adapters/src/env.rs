// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the transport layer.

use std::path::PathBuf;
use std::time::Duration;

use crate::transport::TransportError;

/// File name of the daemon socket inside its directory.
pub const SOCKET_NAME: &str = "knobd.sock";

/// Resolve the daemon socket:
/// KNOB_SOCKET > XDG_RUNTIME_DIR/knob > state dir/knob > ~/.local/state/knob
pub fn socket_path() -> Result<PathBuf, TransportError> {
    if let Ok(path) = std::env::var("KNOB_SOCKET") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir).join("knob").join(SOCKET_NAME));
        }
    }
    dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/state")))
        .map(|dir| dir.join("knob").join(SOCKET_NAME))
        .ok_or(TransportError::NoSocketPath)
}

/// Per-request IPC timeout (default 5s, configurable via `KNOB_IPC_TIMEOUT_MS`).
pub fn ipc_timeout() -> Duration {
    std::env::var("KNOB_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for specs.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub use knob_adapters::{MemoryDaemon, SocketTransport};
pub use knob_client::{ChannelError, Registry};
pub use knob_core::{Kind, NativeStruct, StructLayout, Value, WireValue};

/// Short enough that a hung daemon fails fast.
pub const TIMEOUT: Duration = Duration::from_secs(2);

/// An in-memory daemon bound to a socket in a private temp dir.
pub struct Daemon {
    daemon: MemoryDaemon,
    _dir: tempfile::TempDir,
}

impl Daemon {
    pub fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let daemon = MemoryDaemon::start(dir.path().join("knobd.sock")).unwrap();
        Self { daemon, _dir: dir }
    }

    pub fn socket(&self) -> &Path {
        self.daemon.path()
    }

    /// Seed a property without notifying watchers.
    pub fn seed(&self, channel: &str, property: &str, value: WireValue) -> &Self {
        self.daemon.insert(channel, property, value);
        self
    }

    pub fn lock(&self, channel: &str, property: &str) -> &Self {
        self.daemon.lock(channel, property);
        self
    }

    pub fn value(&self, channel: &str, property: &str) -> Option<WireValue> {
        self.daemon.value(channel, property)
    }

    /// A registry talking to this daemon over its socket.
    pub fn registry(&self) -> Arc<Registry> {
        let transport = SocketTransport::new(self.socket(), TIMEOUT).unwrap();
        Registry::new(Arc::new(transport))
    }

    /// The `knob` binary, pointed at this daemon through the environment.
    pub fn knob(&self) -> Cli {
        cli().env("KNOB_SOCKET", self.socket())
    }
}

pub fn cli() -> Cli {
    let mut cmd = assert_cmd::Command::cargo_bin("knob").unwrap();
    cmd.env_remove("KNOB_SOCKET").env("NO_COLOR", "1").timeout(Duration::from_secs(10));
    Cli { cmd }
}

/// Fluent wrapper around one `knob` invocation.
pub struct Cli {
    cmd: assert_cmd::Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Run {
        Run::from(self.cmd.assert().success().get_output())
    }

    pub fn exits(mut self, code: i32) -> Run {
        Run::from(self.cmd.assert().code(code).get_output())
    }
}

/// Captured output of a finished invocation.
pub struct Run {
    stdout: String,
    stderr: String,
}

impl From<&std::process::Output> for Run {
    fn from(output: &std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Run {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        assert_eq!(self.stdout, expected, "stderr:\n{}", self.stderr);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "expected {needle:?} in stdout:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "expected {needle:?} in stderr:\n{}", self.stderr);
        self
    }
}

/// Dispatch queued events until `done` holds, failing after a few seconds.
pub fn pump_until(registry: &Registry, mut done: impl FnMut() -> bool) {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    loop {
        registry.dispatch_pending();
        if done() {
            return;
        }
        assert!(std::time::Instant::now() < deadline, "condition not reached in time");
        std::thread::sleep(Duration::from_millis(10));
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `knob watch` streams changes made by other clients

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::prelude::*;

#[test]
fn watch_prints_changes_under_base() {
    let daemon = Daemon::start();
    let mut child = Command::new(assert_cmd::cargo::cargo_bin("knob"))
        .args(["watch", "apps", "--base", "/editor"])
        .env("KNOB_SOCKET", daemon.socket())
        .env("NO_COLOR", "1")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let stdout = child.stdout.take().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    // Keep writing until the watcher has subscribed and reports a change.
    let writer = daemon.registry().create("apps");
    let mut first = None;
    for tick in 0..50u32 {
        writer.set("/other", tick).unwrap();
        writer.set("/editor/size", tick).unwrap();
        if let Ok(line) = rx.recv_timeout(Duration::from_millis(100)) {
            first = Some(line);
            break;
        }
    }
    let first = first.expect("watcher never reported a change");
    assert!(first.starts_with("/size = "), "unexpected line {first:?}");

    writer.reset("/editor/size", false).unwrap();
    let mut removal = None;
    while let Ok(line) = rx.recv_timeout(Duration::from_secs(2)) {
        if line == "/size (unset)" {
            removal = Some(line);
            break;
        }
        assert!(line.starts_with("/size = "), "unexpected line {line:?}");
    }
    assert!(removal.is_some(), "removal not reported");

    child.kill().unwrap();
    child.wait().unwrap();
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! get / set / reset / list / locked / channels against a live daemon

use crate::prelude::*;

#[test]
fn get_prints_stored_value() {
    let daemon = Daemon::start();
    daemon.seed("apps", "/editor/size", WireValue::U32(42));

    daemon.knob().args(&["get", "apps", "/editor/size"]).passes().stdout_eq("42\n");
    daemon
        .knob()
        .args(&["get", "apps", "/editor/size", "--type", "uint16", "-o", "json"])
        .passes()
        .stdout_eq("42\n");
}

#[test]
fn get_missing_exits_two() {
    let daemon = Daemon::start();
    daemon.knob().args(&["get", "apps", "/nope"]).exits(2).stderr_has("/nope");
}

#[test]
fn set_then_get_keeps_kind() {
    let daemon = Daemon::start();
    daemon.knob().args(&["set", "apps", "/port", "8080", "--type", "uint16"]).passes();
    assert_eq!(daemon.value("apps", "/port"), Some(WireValue::U32(8080)));

    // no --type: the stored kind wins
    daemon.knob().args(&["set", "apps", "/port", "9090"]).passes();
    assert_eq!(daemon.value("apps", "/port"), Some(WireValue::U32(9090)));

    daemon.knob().args(&["get", "apps", "/port"]).passes().stdout_eq("9090\n");
}

#[test]
fn set_array_with_typed_elements() {
    let daemon = Daemon::start();
    daemon
        .knob()
        .args(&[
            "set", "apps", "/window", "--array", "--value", "800", "--type", "uint",
            "--value", "main", "--type", "string",
        ])
        .passes();
    assert_eq!(
        daemon.value("apps", "/window"),
        Some(WireValue::Array(vec![WireValue::U32(800), WireValue::String("main".into())]))
    );
    daemon
        .knob()
        .args(&["get", "apps", "/window", "-o", "json"])
        .passes()
        .stdout_eq("[800,\"main\"]\n");
}

#[test]
fn set_locked_property_fails() {
    let daemon = Daemon::start();
    daemon.seed("apps", "/policy", WireValue::Bool(true)).lock("apps", "/policy");

    daemon.knob().args(&["set", "apps", "/policy", "false"]).exits(1).stderr_has("locked");
    assert_eq!(daemon.value("apps", "/policy"), Some(WireValue::Bool(true)));
    daemon.knob().args(&["locked", "apps", "/policy"]).passes().stdout_eq("true\n");
    daemon.knob().args(&["locked", "apps", "/other"]).passes().stdout_eq("false\n");
}

#[test]
fn reset_root_needs_recursive() {
    let daemon = Daemon::start();
    daemon.seed("apps", "/a", WireValue::U8(1)).seed("apps", "/b/c", WireValue::U8(2));

    daemon.knob().args(&["reset", "apps", "/"]).exits(1);
    assert!(daemon.value("apps", "/a").is_some());

    daemon.knob().args(&["reset", "apps", "/", "--recursive"]).passes();
    assert_eq!(daemon.value("apps", "/a"), None);
    assert_eq!(daemon.value("apps", "/b/c"), None);
}

#[test]
fn list_and_channels() {
    let daemon = Daemon::start();
    daemon
        .seed("apps", "/editor/font", WireValue::String("Mono".into()))
        .seed("apps", "/editor/size", WireValue::U32(12))
        .seed("apps", "/term/bell", WireValue::Bool(false))
        .seed("desktop", "/wallpaper", WireValue::String("blue".into()));

    daemon.knob().args(&["channels"]).passes().stdout_eq("apps\ndesktop\n");
    daemon
        .knob()
        .args(&["list", "apps", "/editor"])
        .passes()
        .stdout_eq("/editor/font = Mono\n/editor/size = 12\n");

    let run = daemon.knob().args(&["list", "apps", "-o", "json"]).passes();
    let parsed: serde_json::Value = serde_json::from_str(run.stdout()).unwrap();
    assert_eq!(parsed["/term/bell"], serde_json::json!(false));
    assert_eq!(parsed.as_object().map(|o| o.len()), Some(3));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel reads, writes and change propagation over a real socket

use std::sync::Mutex;

use knob_client::PropertyChange;

use crate::prelude::*;

#[test]
fn seeded_value_reads_as_requested_kind() {
    let daemon = Daemon::start();
    daemon.seed("apps", "/a/b", WireValue::U32(42));

    let channel = daemon.registry().get("apps");
    assert_eq!(channel.get("/a/b", Some(Kind::U16)).unwrap(), Value::U16(42));
    assert_eq!(channel.get_int("/a/b", -1), 42);
    assert!(channel.get("/a/missing", None).unwrap_err().is_not_found());
}

#[test]
fn write_then_read_from_another_registry() {
    let daemon = Daemon::start();
    let writer = daemon.registry().create("apps");
    writer.set_double("/ratio", 0.1 + 0.2).unwrap();
    writer.set_string_list("/tags", &["a", "b"]).unwrap();

    let reader = daemon.registry().create("apps");
    assert_eq!(reader.get_double("/ratio", 0.0), 0.1 + 0.2);
    assert_eq!(reader.get_string_list("/tags").unwrap(), vec!["a", "b"]);
}

#[test]
fn changes_reach_listeners_scoped_to_base() {
    let daemon = Daemon::start();
    let registry = daemon.registry();
    registry.watch().unwrap();

    let scoped = registry.create_with_base("apps", Some("/foo"));
    let seen = std::sync::Arc::new(Mutex::new(Vec::<PropertyChange>::new()));
    let sink = std::sync::Arc::clone(&seen);
    scoped.connect(None, move |change| sink.lock().unwrap().push(change.clone()));

    let writer = daemon.registry().create("apps");
    writer.set("/other/x", 1u8).unwrap();
    writer.set("/foo/bar", 2u8).unwrap();

    pump_until(&registry, || !seen.lock().unwrap().is_empty());
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].property, "/bar");
    assert_eq!(seen[0].value, Some(Value::U8(2)));

    // the mirror followed the event
    assert_eq!(scoped.get("/bar", None).unwrap(), Value::U8(2));
}

#[test]
fn remote_reset_evicts_mirrored_value() {
    let daemon = Daemon::start();
    daemon.seed("apps", "/x", WireValue::Bool(true));
    let registry = daemon.registry();
    registry.watch().unwrap();
    let channel = registry.get("apps");
    assert!(channel.has_property("/x"));

    daemon.registry().create("apps").reset("/x", false).unwrap();
    pump_until(&registry, || !channel.has_property("/x"));
    assert!(channel.get("/x", None).unwrap_err().is_not_found());
}

#[test]
fn locked_property_is_refused_before_writing() {
    let daemon = Daemon::start();
    daemon.seed("apps", "/policy", WireValue::U32(1)).lock("apps", "/policy");

    let channel = daemon.registry().create("apps");
    assert!(channel.is_locked("/policy"));
    assert!(matches!(channel.set_uint("/policy", 2), Err(ChannelError::Locked { .. })));
    assert_eq!(daemon.value("apps", "/policy"), Some(WireValue::U32(1)));
}

#[test]
fn list_channels_and_get_all() {
    let daemon = Daemon::start();
    daemon
        .seed("apps", "/a/x", WireValue::U8(1))
        .seed("apps", "/a/y", WireValue::U8(2))
        .seed("apps", "/b", WireValue::U8(3))
        .seed("desktop", "/z", WireValue::U8(4));

    let registry = daemon.registry();
    assert_eq!(registry.list_channels().unwrap(), vec!["apps", "desktop"]);

    let all = registry.create("apps").get_all("/a").unwrap();
    assert_eq!(all.keys().collect::<Vec<_>>(), vec!["/a/x", "/a/y"]);
}

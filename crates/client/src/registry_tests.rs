// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Barrier;
use std::thread;

use knob_adapters::{FakeTransport, TransportCall};
use knob_core::{Kind, Value, WireValue};

use super::*;

fn setup() -> (FakeTransport, Arc<Registry>) {
    let fake = FakeTransport::new();
    let registry = Registry::new(Arc::new(fake.clone()));
    (fake, registry)
}

fn prefetches(fake: &FakeTransport) -> usize {
    fake.count_calls(|c| matches!(c, TransportCall::GetAll { .. }))
}

#[test]
fn concurrent_singleton_lookups_share_one_instance() {
    let (fake, registry) = setup();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.get("apps")
            })
        })
        .collect();
    let channels: Vec<Arc<Channel>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(channels.iter().all(|c| Arc::ptr_eq(c, &channels[0])));
    assert!(channels[0].is_singleton());
    assert_eq!(prefetches(&fake), 1);
}

#[test]
fn private_channels_are_distinct() {
    let (fake, registry) = setup();

    let a = registry.create("apps");
    let b = registry.create("apps");

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!a.is_singleton());
    assert_eq!(prefetches(&fake), 2);
}

#[test]
fn prefetch_is_scoped_to_the_base() {
    let (fake, registry) = setup();

    registry.create_with_base("apps", Some("/foo"));

    assert!(fake.calls().contains(&TransportCall::GetAll {
        channel: "apps".into(),
        base: Some("/foo".into()),
    }));
}

#[test]
fn prefetch_failure_does_not_fail_construction() {
    let (fake, registry) = setup();
    fake.insert("apps", "/x", WireValue::Bool(true));
    fake.set_failing(true);

    let channel = registry.get("apps");

    fake.set_failing(false);
    assert!(channel.get_bool("/x", false));
}

#[test]
fn shutdown_releases_singletons_only() {
    let (_fake, registry) = setup();
    let before = registry.get("apps");
    let private = registry.create("apps");

    registry.shutdown();
    let after = registry.get("apps");

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(private.name(), "apps");
    registry.shutdown();
}

#[test]
fn dispatch_reaches_every_matching_channel() {
    let (fake, registry) = setup();
    let apps = registry.get("apps");
    let scoped = registry.create_with_base("apps", Some("/plugin"));
    let panel = registry.create("panel");
    registry.watch().unwrap();

    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    for channel in [&apps, &scoped, &panel] {
        let seen = Arc::clone(&seen);
        let name = format!("{}{}", channel.name(), channel.property_base().unwrap_or(""));
        channel.connect(None, move |change| {
            seen.lock().push((name.clone(), change.property.clone()));
        });
    }

    fake.set_property("apps", "/plugin/count", WireValue::U32(42)).unwrap();
    assert!(seen.lock().is_empty(), "delivery waits for dispatch");
    assert_eq!(registry.dispatch_pending(), 1);

    let seen = seen.lock().clone();
    assert_eq!(
        seen,
        vec![
            ("apps".to_string(), "/plugin/count".to_string()),
            ("apps/plugin".to_string(), "/count".to_string()),
        ]
    );
    assert_eq!(apps.get("/plugin/count", Some(Kind::U16)).unwrap(), Value::U16(42));
}

#[test]
fn dropped_private_channels_stop_receiving() {
    let (_fake, registry) = setup();
    let channel = registry.create("apps");
    drop(channel);

    let event = PropertyChanged { channel: "apps".into(), property: "/x".into(), value: None };
    assert_eq!(registry.dispatch(&event), 0);
}

#[test]
fn run_dispatch_requires_watch_and_ends_with_stream() {
    let (fake, registry) = setup();
    assert!(registry.run_dispatch().is_err());

    let channel = registry.get("apps");
    let hits = Arc::new(parking_lot::Mutex::new(0));
    let counter = Arc::clone(&hits);
    channel.connect(Some("/a"), move |_| *counter.lock() += 1);
    registry.watch().unwrap();
    fake.set_property("apps", "/a", WireValue::I8(1)).unwrap();

    let worker = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || registry.run_dispatch())
    };
    fake.close_watchers();

    worker.join().unwrap().unwrap();
    assert_eq!(*hits.lock(), 1);
}

#[test]
fn struct_names_bind_once() {
    let (_fake, registry) = setup();
    let layout = StructLayout::new([Kind::I32, Kind::I32]).unwrap();

    registry.register_struct("point", layout.clone()).unwrap();
    let err = registry.register_struct("point", layout.clone()).unwrap_err();

    assert!(matches!(err, ChannelError::Validation(_)));
    assert_eq!(*registry.lookup_struct("point").unwrap(), layout);
    assert!(registry.lookup_struct("line").is_err());
}

#[test]
fn list_channels_forwards() {
    let (fake, registry) = setup();
    fake.insert("apps", "/a", WireValue::U8(0));
    fake.insert("panel", "/b", WireValue::U8(0));

    assert_eq!(registry.list_channels().unwrap(), vec!["apps", "panel"]);
}

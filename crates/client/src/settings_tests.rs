// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use knob_adapters::FakeTransport;
use knob_core::WireValue;
use knob_wire::PropertyChanged;

use super::*;

struct Harness {
    fake: FakeTransport,
    registry: Arc<Registry>,
    backend: SettingsBackend,
    seen: Arc<Mutex<Vec<SettingsChange>>>,
}

fn harness() -> Harness {
    let fake = FakeTransport::new();
    let registry = Registry::new(Arc::new(fake.clone()));
    registry.watch().unwrap();
    let backend = SettingsBackend::new(&registry, "editor");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    backend.on_changed(move |change| sink.lock().push(change.clone()));
    Harness { fake, registry, backend, seen }
}

impl Harness {
    fn pump(&self) -> Vec<SettingsChange> {
        self.registry.dispatch_pending();
        std::mem::take(&mut *self.seen.lock())
    }

    fn external(&self, property: &str) {
        self.fake.emit(PropertyChanged {
            channel: "editor".into(),
            property: property.into(),
            value: Some(WireValue::Bool(true)),
        });
    }
}

#[test]
fn own_write_is_attributed_once() {
    let h = harness();
    h.backend.subscribe("/font");

    h.backend.write("/font", Value::from(5i32), OriginTag(11)).unwrap();
    assert_eq!(
        h.pump(),
        vec![SettingsChange { key: "/font".into(), origin: Some(OriginTag(11)) }]
    );

    h.external("/font");
    assert_eq!(h.pump(), vec![SettingsChange { key: "/font".into(), origin: None }]);
}

#[test]
fn failed_write_drops_pending_entry() {
    let h = harness();
    h.fake.lock("editor", "/theme");
    h.backend.subscribe("/");

    let err = h.backend.write("/theme", Value::from("dark"), OriginTag(3)).unwrap_err();
    assert!(matches!(err, ChannelError::Locked { .. }));

    h.external("/theme");
    assert_eq!(h.pump(), vec![SettingsChange { key: "/theme".into(), origin: None }]);
}

#[test]
fn unsubscribed_changes_are_dropped() {
    let h = harness();
    h.backend.subscribe("/a/");

    h.external("/b/x");
    h.external("/a/x");
    assert_eq!(h.pump(), vec![SettingsChange { key: "/a/x".into(), origin: None }]);

    h.backend.unsubscribe("/a/");
    h.external("/a/y");
    assert!(h.pump().is_empty());
}

#[test]
fn reset_is_recursive_and_tagged() {
    let h = harness();
    h.fake.insert("editor", "/k", WireValue::U8(1));
    h.fake.insert("editor", "/k/sub", WireValue::U8(2));
    h.backend.subscribe("/k");

    h.backend.reset("/k", OriginTag(4)).unwrap();

    assert_eq!(h.fake.value("editor", "/k/sub"), None);
    let changes = h.pump();
    assert!(changes.contains(&SettingsChange { key: "/k".into(), origin: Some(OriginTag(4)) }));
    assert!(changes.contains(&SettingsChange { key: "/k/sub".into(), origin: None }));
}

#[test]
fn read_checks_expected_kind() {
    let h = harness();
    h.fake.insert("editor", "/size", WireValue::I32(12));

    assert_eq!(h.backend.read("/size", Kind::I32, false), Some(Value::I32(12)));
    assert_eq!(h.backend.read("/size", Kind::String, false), None);
    assert_eq!(h.backend.read("/size", Kind::I32, true), None);
    assert_eq!(h.backend.read("/absent", Kind::I32, false), None);
}

#[test]
fn writability_follows_locks() {
    let h = harness();
    h.fake.lock("editor", "/locked");

    assert!(!h.backend.is_writable("/locked"));
    assert!(h.backend.is_writable("/free"));
}

#[test]
fn dropping_backend_disconnects_listener() {
    let h = harness();
    let channel = Arc::clone(h.backend.channel());
    h.backend.subscribe("/");
    let seen = Arc::clone(&h.seen);
    let Harness { registry, fake, backend, .. } = h;
    drop(backend);

    fake.emit(PropertyChanged {
        channel: "editor".into(),
        property: "/x".into(),
        value: None,
    });
    registry.dispatch_pending();

    assert!(seen.lock().is_empty());
    assert_eq!(channel.name(), "editor");
}

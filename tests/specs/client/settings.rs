// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings bridge attribution over a real socket

use std::sync::{Arc, Mutex};

use knob_client::{OriginTag, SettingsBackend, SettingsChange};

use crate::prelude::*;

#[test]
fn own_writes_carry_origin_and_external_ones_do_not() {
    let daemon = Daemon::start();
    let registry = daemon.registry();
    registry.watch().unwrap();

    let backend = SettingsBackend::new(&registry, "editor");
    backend.subscribe("/font");
    let seen = Arc::new(Mutex::new(Vec::<SettingsChange>::new()));
    let sink = Arc::clone(&seen);
    backend.on_changed(move |change| sink.lock().unwrap().push(change.clone()));

    backend.write("/font/size", Value::I32(11), OriginTag(9)).unwrap();
    pump_until(&registry, || seen.lock().unwrap().len() == 1);

    daemon.registry().create("editor").set("/font/name", "Mono").unwrap();
    pump_until(&registry, || seen.lock().unwrap().len() == 2);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].key, "/font/size");
    assert_eq!(seen[0].origin, Some(OriginTag(9)));
    assert_eq!(seen[1].key, "/font/name");
    assert_eq!(seen[1].origin, None);

    assert_eq!(backend.read("/font/size", Kind::I32, false), Some(Value::I32(11)));
    assert!(backend.is_writable("/font/size"));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Struct values survive the trip through the daemon byte for byte

use crate::prelude::*;

fn geometry() -> StructLayout {
    StructLayout::new([Kind::U8, Kind::U64, Kind::U16, Kind::String]).unwrap()
}

fn sample(layout: &StructLayout) -> NativeStruct {
    let mut native = NativeStruct::zeroed(layout);
    native.set(0, Value::U8(7)).unwrap();
    native.set(1, Value::U64(u64::MAX - 1)).unwrap();
    native.set(2, Value::U16(65535)).unwrap();
    native.set(3, Value::String("left".into())).unwrap();
    native
}

#[test]
fn named_struct_roundtrip() {
    let daemon = Daemon::start();
    let registry = daemon.registry();
    registry.register_struct("geometry", geometry()).unwrap();

    let layout = registry.lookup_struct("geometry").unwrap();
    let native = sample(&layout);
    let channel = registry.create("apps");
    channel.set_named_struct("/window", "geometry", &native).unwrap();

    // 16-bit members travel as 32-bit values
    assert_eq!(
        daemon.value("apps", "/window"),
        Some(WireValue::Array(vec![
            WireValue::U8(7),
            WireValue::U64(u64::MAX - 1),
            WireValue::U32(65535),
            WireValue::String("left".into()),
        ]))
    );

    let fresh = daemon.registry().create("apps");
    let read = fresh.get_struct("/window", &layout).unwrap();
    assert_eq!(read.as_bytes(), native.as_bytes());
    assert_eq!(read.strings(), native.strings());
}

#[test]
fn member_count_mismatch_is_rejected() {
    let daemon = Daemon::start();
    daemon.seed("apps", "/pair", WireValue::Array(vec![WireValue::U8(1), WireValue::U8(2)]));

    let channel = daemon.registry().create("apps");
    assert!(matches!(
        channel.get_struct("/pair", &geometry()),
        Err(ChannelError::Validation(_))
    ));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for protocol serde roundtrips.
//!
//! Covers every variant of Request and Response with minimal fixed field
//! values, plus arbitrary property values inside `SetProperty`.

use std::collections::BTreeMap;

use knob_core::test_support::strategies::arb_scalar_value;
use knob_core::{to_wire, WireValue};
use proptest::prelude::*;

use super::*;

fn s() -> String {
    String::new()
}

fn all_requests() -> Vec<Request> {
    vec![
        Request::Ping,
        Request::Hello { version: s() },
        Request::ListChannels,
        Request::GetProperty { channel: s(), property: s() },
        Request::GetAllProperties { channel: s(), base: None },
        Request::GetAllProperties { channel: s(), base: Some("/a".into()) },
        Request::SetProperty { channel: s(), property: s(), value: WireValue::Bool(true) },
        Request::ResetProperty { channel: s(), base: s(), recursive: true },
        Request::IsPropertyLocked { channel: s(), property: s() },
        Request::Watch,
    ]
}

fn all_responses() -> Vec<Response> {
    vec![
        Response::Ok,
        Response::Pong,
        Response::Hello { version: s() },
        Response::Channels { channels: vec!["a".into()] },
        Response::Property { value: Some(WireValue::Strv(vec![s()])) },
        Response::Property { value: None },
        Response::Properties {
            properties: BTreeMap::from([("/x".to_string(), WireValue::I64(-1))]),
        },
        Response::Locked { locked: false },
        Response::Changed(PropertyChanged { channel: s(), property: s(), value: None }),
        Response::Error { kind: ErrorKind::InvalidChannel, message: s() },
    ]
}

proptest! {
    #[test]
    fn request_serde_roundtrip(req in proptest::sample::select(all_requests())) {
        let encoded = encode(&req).expect("encode");
        let decoded: Request = decode(&encoded).expect("decode");
        prop_assert_eq!(decoded, req);
    }

    #[test]
    fn response_serde_roundtrip(resp in proptest::sample::select(all_responses())) {
        let encoded = encode(&resp).expect("encode");
        let decoded: Response = decode(&encoded).expect("decode");
        prop_assert_eq!(decoded, resp);
    }

    #[test]
    fn set_property_carries_any_value(value in arb_scalar_value()) {
        let req = Request::SetProperty {
            channel: "apps".into(),
            property: "/p".into(),
            value: to_wire(&value),
        };
        let decoded: Request = decode(&encode(&req).expect("encode")).expect("decode");
        prop_assert_eq!(decoded, req);
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for values and struct layouts.
pub mod strategies {
    use crate::kind::Kind;
    use crate::value::Value;
    use proptest::prelude::*;

    fn arb_f32() -> impl Strategy<Value = f32> {
        prop::num::f32::NORMAL | prop::num::f32::ZERO
    }

    fn arb_f64() -> impl Strategy<Value = f64> {
        prop::num::f64::NORMAL | prop::num::f64::ZERO
    }

    /// Kinds allowed as struct members.
    pub fn arb_member_kind() -> impl Strategy<Value = Kind> {
        prop::sample::select(
            Kind::ALL.iter().copied().filter(|k| k.is_scalar()).collect::<Vec<_>>(),
        )
    }

    /// A value of exactly `kind` (scalar kinds only).
    pub fn arb_value_of(kind: Kind) -> BoxedStrategy<Value> {
        match kind {
            Kind::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
            Kind::U8 => any::<u8>().prop_map(Value::U8).boxed(),
            Kind::I8 => any::<i8>().prop_map(Value::I8).boxed(),
            Kind::U16 => any::<u16>().prop_map(Value::U16).boxed(),
            Kind::I16 => any::<i16>().prop_map(Value::I16).boxed(),
            Kind::U32 => any::<u32>().prop_map(Value::U32).boxed(),
            Kind::I32 => any::<i32>().prop_map(Value::I32).boxed(),
            Kind::U64 => any::<u64>().prop_map(Value::U64).boxed(),
            Kind::I64 => any::<i64>().prop_map(Value::I64).boxed(),
            Kind::Float => arb_f32().prop_map(Value::Float).boxed(),
            Kind::Double => arb_f64().prop_map(Value::Double).boxed(),
            Kind::String => "[a-zA-Z0-9 /._-]{0,12}".prop_map(Value::String).boxed(),
            Kind::Strv => prop::collection::vec("[a-z]{0,6}", 0..4).prop_map(Value::Strv).boxed(),
            Kind::Array => Just(Value::Array(Vec::new())).boxed(),
        }
    }

    /// Any scalar value (never NaN, so equality holds).
    pub fn arb_scalar_value() -> impl Strategy<Value = Value> {
        arb_member_kind().prop_flat_map(arb_value_of)
    }

    /// Member kinds plus one conforming value per member.
    pub fn arb_struct_values() -> impl Strategy<Value = (Vec<Kind>, Vec<Value>)> {
        prop::collection::vec(arb_member_kind(), 1..8).prop_flat_map(|kinds| {
            let values = kinds.iter().map(|k| arb_value_of(*k)).collect::<Vec<_>>();
            (Just(kinds), values)
        })
    }
}

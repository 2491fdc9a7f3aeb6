// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conversion between application values and wire values.
//!
//! Outbound, 16-bit integers are rewrapped as 32-bit wire values of the same
//! signedness (recursively inside arrays). Inbound, a value is returned in its
//! native kind unless the caller asks for another one, in which case a generic
//! numeric/string conversion is applied. Arrays convert element by element
//! and fail as a whole.

use crate::error::ConversionError;
use crate::kind::Kind;
use crate::value::{Value, WireValue};

/// Convert an application value into its wire representation.
pub fn to_wire(value: &Value) -> WireValue {
    match value {
        Value::Bool(v) => WireValue::Bool(*v),
        Value::U8(v) => WireValue::U8(*v),
        Value::I8(v) => WireValue::I8(*v),
        Value::U16(v) => WireValue::U32(u32::from(*v)),
        Value::I16(v) => WireValue::I32(i32::from(*v)),
        Value::U32(v) => WireValue::U32(*v),
        Value::I32(v) => WireValue::I32(*v),
        Value::U64(v) => WireValue::U64(*v),
        Value::I64(v) => WireValue::I64(*v),
        Value::Float(v) => WireValue::Float(*v),
        Value::Double(v) => WireValue::Double(*v),
        Value::String(v) => WireValue::String(v.clone()),
        Value::Strv(v) => WireValue::Strv(v.clone()),
        Value::Array(items) => WireValue::Array(items.iter().map(to_wire).collect()),
    }
}

/// Convert a wire value back, optionally into a requested kind.
///
/// A 32-bit wire value requested as 16-bit is narrowed by truncation.
pub fn from_wire(wire: WireValue, requested: Option<Kind>) -> Result<Value, ConversionError> {
    let native = Value::from(wire);
    let Some(to) = requested else {
        return Ok(native);
    };
    if native.kind() == to {
        return Ok(native);
    }
    match native {
        Value::Array(items) if to.is_scalar() => convert_elements(items, to).map(Value::Array),
        other => convert(other, to),
    }
}

/// Convert every element to `to`; the first failure discards the whole result.
pub fn convert_elements(items: Vec<Value>, to: Kind) -> Result<Vec<Value>, ConversionError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            convert(item, to)
                .map_err(|e| ConversionError::Element { index, source: Box::new(e) })
        })
        .collect()
}

/// Generic conversion of a single value to `to`.
pub fn convert(value: Value, to: Kind) -> Result<Value, ConversionError> {
    let from = value.kind();
    if from == to {
        return Ok(value);
    }
    let mismatch = || ConversionError::TypeMismatch { from, to };

    match (value, to) {
        (Value::Strv(items), Kind::Array) => {
            Ok(Value::Array(items.into_iter().map(Value::String).collect()))
        }
        (Value::Array(items), Kind::Strv) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(mismatch()),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Strv),
        (Value::Strv(_) | Value::Array(_), _) | (_, Kind::Strv | Kind::Array) => Err(mismatch()),

        (Value::String(s), Kind::Bool) => parse_bool(&s)
            .map(Value::Bool)
            .ok_or(ConversionError::Parse { input: s, to }),
        (Value::String(s), to) => parse_number(&s, to),
        (value, Kind::String) => Ok(Value::String(value.to_string())),

        (Value::Bool(b), to) => cast(Num::U(u64::from(b)), to).ok_or_else(mismatch),
        (value, Kind::Bool) => Ok(Value::Bool(!to_num(&value).map(Num::is_zero).unwrap_or(true))),
        (value, to) => to_num(&value).and_then(|n| cast(n, to)).ok_or_else(mismatch),
    }
}

#[derive(Debug, Clone, Copy)]
enum Num {
    U(u64),
    I(i64),
    F(f64),
}

impl Num {
    fn is_zero(self) -> bool {
        match self {
            Num::U(v) => v == 0,
            Num::I(v) => v == 0,
            Num::F(v) => v == 0.0,
        }
    }
}

fn to_num(value: &Value) -> Option<Num> {
    let n = match value {
        Value::Bool(v) => Num::U(u64::from(*v)),
        Value::U8(v) => Num::U(u64::from(*v)),
        Value::U16(v) => Num::U(u64::from(*v)),
        Value::U32(v) => Num::U(u64::from(*v)),
        Value::U64(v) => Num::U(*v),
        Value::I8(v) => Num::I(i64::from(*v)),
        Value::I16(v) => Num::I(i64::from(*v)),
        Value::I32(v) => Num::I(i64::from(*v)),
        Value::I64(v) => Num::I(*v),
        Value::Float(v) => Num::F(f64::from(*v)),
        Value::Double(v) => Num::F(*v),
        Value::String(_) | Value::Strv(_) | Value::Array(_) => return None,
    };
    Some(n)
}

/// C-style numeric cast: integers wrap, floats saturate.
///
/// `None` for kinds that are not numbers or booleans.
fn cast(n: Num, to: Kind) -> Option<Value> {
    macro_rules! as_ty {
        ($ty:ty) => {
            match n {
                Num::U(v) => v as $ty,
                Num::I(v) => v as $ty,
                Num::F(v) => v as $ty,
            }
        };
    }
    let value = match to {
        Kind::Bool => Value::Bool(!n.is_zero()),
        Kind::U8 => Value::U8(as_ty!(u8)),
        Kind::I8 => Value::I8(as_ty!(i8)),
        Kind::U16 => Value::U16(as_ty!(u16)),
        Kind::I16 => Value::I16(as_ty!(i16)),
        Kind::U32 => Value::U32(as_ty!(u32)),
        Kind::I32 => Value::I32(as_ty!(i32)),
        Kind::U64 => Value::U64(as_ty!(u64)),
        Kind::I64 => Value::I64(as_ty!(i64)),
        Kind::Float => Value::Float(as_ty!(f32)),
        Kind::Double => Value::Double(as_ty!(f64)),
        Kind::String | Kind::Strv | Kind::Array => return None,
    };
    Some(value)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_number(s: &str, to: Kind) -> Result<Value, ConversionError> {
    let input = s.trim();
    let err = || ConversionError::Parse { input: s.to_string(), to };
    let value = match to {
        Kind::U8 => Value::U8(input.parse().map_err(|_| err())?),
        Kind::I8 => Value::I8(input.parse().map_err(|_| err())?),
        Kind::U16 => Value::U16(input.parse().map_err(|_| err())?),
        Kind::I16 => Value::I16(input.parse().map_err(|_| err())?),
        Kind::U32 => Value::U32(input.parse().map_err(|_| err())?),
        Kind::I32 => Value::I32(input.parse().map_err(|_| err())?),
        Kind::U64 => Value::U64(input.parse().map_err(|_| err())?),
        Kind::I64 => Value::I64(input.parse().map_err(|_| err())?),
        Kind::Float => Value::Float(input.parse().map_err(|_| err())?),
        Kind::Double => Value::Double(input.parse().map_err(|_| err())?),
        Kind::Bool | Kind::String | Kind::Strv | Kind::Array => {
            return Err(ConversionError::TypeMismatch { from: Kind::String, to })
        }
    };
    Ok(value)
}

impl From<WireValue> for Value {
    fn from(wire: WireValue) -> Self {
        match wire {
            WireValue::Bool(v) => Value::Bool(v),
            WireValue::U8(v) => Value::U8(v),
            WireValue::I8(v) => Value::I8(v),
            WireValue::U32(v) => Value::U32(v),
            WireValue::I32(v) => Value::I32(v),
            WireValue::U64(v) => Value::U64(v),
            WireValue::I64(v) => Value::I64(v),
            WireValue::Float(v) => Value::Float(v),
            WireValue::Double(v) => Value::Double(v),
            WireValue::String(v) => Value::String(v),
            WireValue::Strv(v) => Value::Strv(v),
            WireValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
        }
    }
}

impl From<&Value> for WireValue {
    fn from(value: &Value) -> Self {
        to_wire(value)
    }
}

#[cfg(test)]
#[path = "convert_tests.rs"]
mod tests;

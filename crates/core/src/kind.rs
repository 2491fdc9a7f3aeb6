// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Value kinds: the closed set of types a property can hold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind tag for a [`Value`](crate::Value).
///
/// 16-bit kinds exist only on the application side; the wire carries them as
/// their 32-bit counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    Float,
    Double,
    String,
    Strv,
    Array,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Kind; 14] = [
        Kind::Bool,
        Kind::U8,
        Kind::I8,
        Kind::U16,
        Kind::I16,
        Kind::U32,
        Kind::I32,
        Kind::U64,
        Kind::I64,
        Kind::Float,
        Kind::Double,
        Kind::String,
        Kind::Strv,
        Kind::Array,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::U8 => "uint8",
            Kind::I8 => "int8",
            Kind::U16 => "uint16",
            Kind::I16 => "int16",
            Kind::U32 => "uint",
            Kind::I32 => "int",
            Kind::U64 => "uint64",
            Kind::I64 => "int64",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::String => "string",
            Kind::Strv => "strv",
            Kind::Array => "array",
        }
    }

    /// True for kinds holding a single scalar (everything but string lists
    /// and value arrays).
    pub fn is_scalar(self) -> bool {
        !matches!(self, Kind::Strv | Kind::Array)
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Kind::Bool | Kind::String | Kind::Strv | Kind::Array)
    }

    /// The kind used on the wire for this kind.
    pub fn wire_kind(self) -> Kind {
        match self {
            Kind::U16 => Kind::U32,
            Kind::I16 => Kind::I32,
            other => other,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized kind name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Kind::Bool,
            "uint8" | "uchar" => Kind::U8,
            "int8" | "char" => Kind::I8,
            "uint16" => Kind::U16,
            "int16" => Kind::I16,
            "uint" | "uint32" => Kind::U32,
            "int" | "int32" => Kind::I32,
            "uint64" => Kind::U64,
            "int64" => Kind::I64,
            "float" => Kind::Float,
            "double" => Kind::Double,
            "string" => Kind::String,
            "strv" => Kind::Strv,
            "array" => Kind::Array,
            _ => return Err(UnknownKind(s.to_string())),
        };
        Ok(kind)
    }
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;

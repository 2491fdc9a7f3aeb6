// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Conversion and layout errors.

use thiserror::Error;

use crate::kind::Kind;

/// A value could not be converted to the requested kind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("cannot convert value of type \"{from}\" to type \"{to}\"")]
    TypeMismatch { from: Kind, to: Kind },

    #[error("cannot convert string {input:?} to type \"{to}\"")]
    Parse { input: String, to: Kind },

    #[error("array member {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<ConversionError>,
    },
}

impl ConversionError {
    /// Source and target kinds, for diagnostics.
    pub fn kinds(&self) -> (Kind, Kind) {
        match self {
            ConversionError::TypeMismatch { from, to } => (*from, *to),
            ConversionError::Parse { to, .. } => (Kind::String, *to),
            ConversionError::Element { source, .. } => source.kinds(),
        }
    }
}

/// Struct layout construction or (un)packing failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("struct layout has no members")]
    Empty,

    #[error("type \"{0}\" cannot be a struct member")]
    UnsupportedMember(Kind),

    #[error("value array does not match the number of struct members ({actual} != {expected})")]
    MemberCount { expected: usize, actual: usize },

    #[error("struct member {index}: {source}")]
    Member {
        index: usize,
        #[source]
        source: ConversionError,
    },

    #[error("struct buffer does not belong to this layout")]
    ForeignBuffer,

    #[error("struct member {index} out of range")]
    OutOfRange { index: usize },
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! knob-core: value model for the knob configuration store

pub mod convert;
pub mod error;
pub mod kind;
pub mod layout;
pub mod named;
pub mod path;
pub mod value;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use convert::{convert, from_wire, to_wire};
pub use error::{ConversionError, LayoutError};
pub use kind::{Kind, UnknownKind};
pub use layout::{pack, unpack, NativeStruct, StructLayout};
pub use named::{NamedStructError, NamedStructs};
pub use value::{Value, WireValue};

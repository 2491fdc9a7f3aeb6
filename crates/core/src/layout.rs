// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-layout native structs packed to and from value arrays.
//!
//! A [`StructLayout`] is an ordered list of scalar member kinds. Member offsets
//! follow the platform's C layout rules: each member starts at the running
//! offset rounded up to its natural alignment, and the total size is padded to
//! the largest member alignment.
//!
//! String members occupy a pointer-sized slot. The slot holds the member's
//! ordinal among the struct's string members; the string itself lives in the
//! [`NativeStruct`]'s string table and is owned by whoever owns the struct.

use std::mem::{align_of, size_of};

use crate::convert::convert;
use crate::error::{ConversionError, LayoutError};
use crate::kind::Kind;
use crate::value::Value;

/// Ordered member kinds of a native struct, with precomputed offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructLayout {
    members: Vec<Kind>,
    slots: Vec<Slot>,
    size: usize,
    n_strings: usize,
}

/// Where a member lives and how it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    offset: usize,
    member: Member,
}

/// Storage class of a member. Only kinds that can live in a struct appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
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
    /// Index into the struct's string table.
    String(usize),
}

impl Member {
    fn size_align(self) -> (usize, usize) {
        match self {
            Member::Bool => (size_of::<bool>(), align_of::<bool>()),
            Member::U8 => (size_of::<u8>(), align_of::<u8>()),
            Member::I8 => (size_of::<i8>(), align_of::<i8>()),
            Member::U16 => (size_of::<u16>(), align_of::<u16>()),
            Member::I16 => (size_of::<i16>(), align_of::<i16>()),
            Member::U32 => (size_of::<u32>(), align_of::<u32>()),
            Member::I32 => (size_of::<i32>(), align_of::<i32>()),
            Member::U64 => (size_of::<u64>(), align_of::<u64>()),
            Member::I64 => (size_of::<i64>(), align_of::<i64>()),
            Member::Float => (size_of::<f32>(), align_of::<f32>()),
            Member::Double => (size_of::<f64>(), align_of::<f64>()),
            Member::String(_) => (size_of::<usize>(), align_of::<usize>()),
        }
    }
}

impl StructLayout {
    pub fn new(members: impl Into<Vec<Kind>>) -> Result<Self, LayoutError> {
        let members = members.into();
        if members.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut slots = Vec::with_capacity(members.len());
        let mut offset = 0;
        let mut max_align = 1;
        let mut n_strings = 0;
        for &kind in &members {
            let member = member_for(kind, &mut n_strings)?;
            let (size, align) = member.size_align();
            offset = align_up(offset, align);
            slots.push(Slot { offset, member });
            offset += size;
            max_align = max_align.max(align);
        }

        Ok(Self { members, slots, size: align_up(offset, max_align), n_strings })
    }

    pub fn members(&self) -> &[Kind] {
        &self.members
    }

    pub fn offsets(&self) -> Vec<usize> {
        self.slots.iter().map(|slot| slot.offset).collect()
    }

    /// Total size in bytes, including trailing padding.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Offsets and string ordinals of the string members, in order.
    fn string_slots(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.slots.iter().filter_map(|slot| match slot.member {
            Member::String(ordinal) => Some((slot.offset, ordinal)),
            _ => None,
        })
    }
}

fn member_for(kind: Kind, n_strings: &mut usize) -> Result<Member, LayoutError> {
    let member = match kind {
        Kind::Bool => Member::Bool,
        Kind::U8 => Member::U8,
        Kind::I8 => Member::I8,
        Kind::U16 => Member::U16,
        Kind::I16 => Member::I16,
        Kind::U32 => Member::U32,
        Kind::I32 => Member::I32,
        Kind::U64 => Member::U64,
        Kind::I64 => Member::I64,
        Kind::Float => Member::Float,
        Kind::Double => Member::Double,
        Kind::String => {
            *n_strings += 1;
            Member::String(*n_strings - 1)
        }
        Kind::Strv | Kind::Array => return Err(LayoutError::UnsupportedMember(kind)),
    };
    Ok(member)
}

fn align_up(offset: usize, align: usize) -> usize {
    (offset + (align - 1)) & !(align - 1)
}

/// A native struct buffer laid out according to a [`StructLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct NativeStruct {
    layout: StructLayout,
    bytes: Vec<u8>,
    strings: Vec<String>,
}

impl NativeStruct {
    /// A zero-filled struct with empty strings.
    pub fn zeroed(layout: &StructLayout) -> Self {
        let mut bytes = vec![0; layout.size];
        for (offset, ordinal) in layout.string_slots() {
            bytes[offset..offset + size_of::<usize>()].copy_from_slice(&ordinal.to_ne_bytes());
        }
        Self { layout: layout.clone(), bytes, strings: vec![String::new(); layout.n_strings] }
    }

    /// Rebuild a struct from its raw parts.
    ///
    /// The buffer must be the layout's size, the string table must hold one
    /// entry per string member, and each string slot must carry its ordinal.
    pub fn from_parts(
        layout: &StructLayout,
        bytes: Vec<u8>,
        strings: Vec<String>,
    ) -> Result<Self, LayoutError> {
        if bytes.len() != layout.size || strings.len() != layout.n_strings {
            return Err(LayoutError::ForeignBuffer);
        }
        let slots_match = layout
            .string_slots()
            .all(|(offset, ordinal)| usize::from_ne_bytes(bytes_at(&bytes, offset)) == ordinal);
        if !slots_match {
            return Err(LayoutError::ForeignBuffer);
        }
        Ok(Self { layout: layout.clone(), bytes, strings })
    }

    pub fn layout(&self) -> &StructLayout {
        &self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<String>) {
        (self.bytes, self.strings)
    }

    /// Read member `index`.
    pub fn get(&self, index: usize) -> Result<Value, LayoutError> {
        let slot = *self.layout.slots.get(index).ok_or(LayoutError::OutOfRange { index })?;
        Ok(self.read(slot))
    }

    /// Write member `index`, converting `value` to the member's kind.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), LayoutError> {
        let kind = *self.layout.members.get(index).ok_or(LayoutError::OutOfRange { index })?;
        let value = convert(value, kind).map_err(|source| LayoutError::Member { index, source })?;
        self.write(index, value)
    }

    fn read(&self, slot: Slot) -> Value {
        let (b, offset) = (&self.bytes, slot.offset);
        match slot.member {
            Member::Bool => Value::Bool(b[offset] != 0),
            Member::U8 => Value::U8(b[offset]),
            Member::I8 => Value::I8(i8::from_ne_bytes(bytes_at(b, offset))),
            Member::U16 => Value::U16(u16::from_ne_bytes(bytes_at(b, offset))),
            Member::I16 => Value::I16(i16::from_ne_bytes(bytes_at(b, offset))),
            Member::U32 => Value::U32(u32::from_ne_bytes(bytes_at(b, offset))),
            Member::I32 => Value::I32(i32::from_ne_bytes(bytes_at(b, offset))),
            Member::U64 => Value::U64(u64::from_ne_bytes(bytes_at(b, offset))),
            Member::I64 => Value::I64(i64::from_ne_bytes(bytes_at(b, offset))),
            Member::Float => Value::Float(f32::from_ne_bytes(bytes_at(b, offset))),
            Member::Double => Value::Double(f64::from_ne_bytes(bytes_at(b, offset))),
            Member::String(ordinal) => Value::String(self.strings[ordinal].clone()),
        }
    }

    /// Store an already-converted value; a value of another kind is rejected.
    fn write(&mut self, index: usize, value: Value) -> Result<(), LayoutError> {
        let slot = self.layout.slots[index];
        let raw: Vec<u8> = match (slot.member, value) {
            (Member::String(ordinal), Value::String(v)) => {
                self.strings[ordinal] = v;
                return Ok(());
            }
            (Member::Bool, Value::Bool(v)) => vec![u8::from(v)],
            (Member::U8, Value::U8(v)) => vec![v],
            (Member::I8, Value::I8(v)) => v.to_ne_bytes().to_vec(),
            (Member::U16, Value::U16(v)) => v.to_ne_bytes().to_vec(),
            (Member::I16, Value::I16(v)) => v.to_ne_bytes().to_vec(),
            (Member::U32, Value::U32(v)) => v.to_ne_bytes().to_vec(),
            (Member::I32, Value::I32(v)) => v.to_ne_bytes().to_vec(),
            (Member::U64, Value::U64(v)) => v.to_ne_bytes().to_vec(),
            (Member::I64, Value::I64(v)) => v.to_ne_bytes().to_vec(),
            (Member::Float, Value::Float(v)) => v.to_ne_bytes().to_vec(),
            (Member::Double, Value::Double(v)) => v.to_ne_bytes().to_vec(),
            (_, value) => {
                let source = ConversionError::TypeMismatch {
                    from: value.kind(),
                    to: self.layout.members[index],
                };
                return Err(LayoutError::Member { index, source });
            }
        };
        self.bytes[slot.offset..slot.offset + raw.len()].copy_from_slice(&raw);
        Ok(())
    }
}

fn bytes_at<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&bytes[offset..offset + N]);
    buf
}

/// Build a native struct from a value array.
///
/// Every element is converted to its member kind before anything is written,
/// so a failure never yields a partially filled struct.
pub fn unpack(values: Vec<Value>, layout: &StructLayout) -> Result<NativeStruct, LayoutError> {
    if values.len() != layout.len() {
        return Err(LayoutError::MemberCount { expected: layout.len(), actual: values.len() });
    }

    let converted = values
        .into_iter()
        .zip(layout.members.iter())
        .enumerate()
        .map(|(index, (value, kind))| {
            convert(value, *kind).map_err(|source| LayoutError::Member { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = NativeStruct::zeroed(layout);
    for (index, value) in converted.into_iter().enumerate() {
        out.write(index, value)?;
    }
    Ok(out)
}

/// Read every member of `native`, in layout order.
pub fn pack(native: &NativeStruct, layout: &StructLayout) -> Result<Vec<Value>, LayoutError> {
    if native.layout != *layout {
        return Err(LayoutError::ForeignBuffer);
    }
    Ok(layout.slots.iter().map(|slot| native.read(*slot)).collect())
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;

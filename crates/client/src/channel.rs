// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A named configuration namespace, optionally scoped to a property base.
//!
//! Every property path a caller passes is channel-relative: with a base of
//! `/foo`, `get("/bar")` reads `/foo/bar`. Change events are re-scoped the
//! other way before they reach listeners.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use knob_adapters::Transport;
use knob_core::path::{self, is_root};
use knob_core::{
    from_wire, pack, to_wire, unpack, ConversionError, Kind, NamedStructs, NativeStruct,
    StructLayout, Value,
};
use knob_wire::PropertyChanged;
use parking_lot::{Mutex, Once};
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::error::ChannelError;
use crate::router;

/// Handle returned by [`Channel::connect`].
pub type ListenerId = u64;

/// A change as seen by a channel listener.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub channel: String,
    /// Channel-local path (`/` when the base itself changed).
    pub property: String,
    /// `None` when the property was removed.
    pub value: Option<Value>,
}

type Callback = Arc<dyn Fn(&PropertyChange) + Send + Sync>;

struct Listener {
    id: ListenerId,
    filter: Option<String>,
    callback: Callback,
}

pub struct Channel {
    name: String,
    property_base: Option<String>,
    is_singleton: bool,
    cache: Cache,
    structs: Arc<NamedStructs>,
    listeners: Mutex<Vec<Listener>>,
    next_listener: AtomicU64,
    warmed: Once,
}

macro_rules! typed_getter {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $variant:ident) => {
        $(#[$doc])*
        pub fn $name(&self, property: &str, default: $ty) -> $ty {
            match self.lookup_native(property) {
                Some(Value::$variant(v)) => v,
                _ => default,
            }
        }
    };
}

impl Channel {
    /// A base of `""` or `/` means no base; a trailing slash is dropped.
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        name: &str,
        property_base: Option<&str>,
        is_singleton: bool,
        structs: Arc<NamedStructs>,
    ) -> Self {
        let property_base =
            property_base.filter(|b| !is_root(b)).map(|b| b.trim_end_matches('/').to_string());
        Self {
            name: name.to_string(),
            property_base,
            is_singleton,
            cache: Cache::new(transport, name),
            structs,
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(1),
            warmed: Once::new(),
        }
    }

    /// Prefetch the channel's subtree, once. Failure only costs cache misses.
    pub(crate) fn warm(&self) {
        self.warmed.call_once(|| {
            if let Err(e) = self.cache.prefetch(self.property_base.as_deref()) {
                warn!(channel = %self.name, error = %e, "prefetch failed");
            }
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_base(&self) -> Option<&str> {
        self.property_base.as_deref()
    }

    pub fn is_singleton(&self) -> bool {
        self.is_singleton
    }

    fn resolve(&self, property: &str) -> String {
        path::resolve(self.property_base.as_deref(), property)
    }

    /// Read a property, converted to `kind` if one is given.
    ///
    /// A missing property is `NotFound`, distinct from a failed conversion.
    pub fn get(&self, property: &str, kind: Option<Kind>) -> Result<Value, ChannelError> {
        let absolute = self.resolve(property);
        let wire = self
            .cache
            .lookup(&absolute)?
            .ok_or(ChannelError::NotFound { property: absolute })?;
        Ok(from_wire(wire, kind)?)
    }

    /// Write a property. Refused up front if the property is locked.
    pub fn set(&self, property: &str, value: impl Into<Value>) -> Result<(), ChannelError> {
        let absolute = self.resolve(property);
        if self.locked(&absolute) {
            return Err(ChannelError::Locked { property: absolute });
        }
        let wire = to_wire(&value.into());
        self.cache.set(&absolute, wire).map_err(|e| ChannelError::from_write(e, &absolute))
    }

    /// Remove a property, or everything under it when `recursive`.
    ///
    /// The channel root (`""` or `/`) can only be reset recursively.
    pub fn reset(&self, property: &str, recursive: bool) -> Result<(), ChannelError> {
        let absolute = if is_root(property) {
            if !recursive {
                return Err(ChannelError::Validation(
                    "resetting the channel root requires recursive".to_string(),
                ));
            }
            self.property_base.clone().unwrap_or_else(|| path::ROOT.to_string())
        } else {
            self.resolve(property)
        };
        self.cache
            .reset(&absolute, recursive)
            .map_err(|e| ChannelError::from_write(e, &absolute))
    }

    pub fn has_property(&self, property: &str) -> bool {
        let absolute = self.resolve(property);
        match self.cache.lookup(&absolute) {
            Ok(found) => found.is_some(),
            Err(e) => {
                warn!(channel = %self.name, property = %absolute, error = %e, "lookup failed");
                false
            }
        }
    }

    /// True if system policy locks the property. A failed query counts as
    /// unlocked.
    pub fn is_locked(&self, property: &str) -> bool {
        self.locked(&self.resolve(property))
    }

    fn locked(&self, absolute: &str) -> bool {
        match self.cache.is_locked(absolute) {
            Ok(locked) => locked,
            Err(e) => {
                warn!(
                    channel = %self.name,
                    property = %absolute,
                    error = %e,
                    "lock query failed, assuming unlocked"
                );
                false
            }
        }
    }

    /// Every property at or under `base`, keyed by absolute path.
    ///
    /// `""` or `/` means the channel's own base (or the whole channel).
    pub fn get_all(&self, base: &str) -> Result<BTreeMap<String, Value>, ChannelError> {
        let absolute =
            if is_root(base) { self.property_base.clone() } else { Some(self.resolve(base)) };
        let properties = self.cache.get_all(absolute.as_deref())?;
        Ok(properties.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    }

    // Typed accessors

    fn lookup_native(&self, property: &str) -> Option<Value> {
        match self.get(property, None) {
            Ok(value) => Some(value),
            Err(ChannelError::NotFound { .. }) => None,
            Err(e) => {
                warn!(channel = %self.name, property, error = %e, "read failed, using default");
                None
            }
        }
    }

    /// The string at `property`, or `default` if unset or not a string.
    pub fn get_string(&self, property: &str, default: &str) -> String {
        match self.lookup_native(property) {
            Some(Value::String(s)) => s,
            _ => default.to_string(),
        }
    }

    typed_getter!(get_int, i32, I32);
    typed_getter!(get_uint, u32, U32);
    typed_getter!(get_uint64, u64, U64);
    typed_getter!(get_double, f64, Double);
    typed_getter!(get_bool, bool, Bool);

    pub fn set_string(&self, property: &str, value: &str) -> Result<(), ChannelError> {
        self.set(property, value)
    }

    /// Write raw bytes as a string, rejecting ill-formed UTF-8.
    pub fn set_utf8(&self, property: &str, bytes: &[u8]) -> Result<(), ChannelError> {
        let s = std::str::from_utf8(bytes).map_err(|e| {
            ChannelError::Validation(format!("value for {property} is not valid UTF-8: {e}"))
        })?;
        self.set(property, s)
    }

    pub fn set_int(&self, property: &str, value: i32) -> Result<(), ChannelError> {
        self.set(property, value)
    }

    pub fn set_uint(&self, property: &str, value: u32) -> Result<(), ChannelError> {
        self.set(property, value)
    }

    pub fn set_uint64(&self, property: &str, value: u64) -> Result<(), ChannelError> {
        self.set(property, value)
    }

    pub fn set_double(&self, property: &str, value: f64) -> Result<(), ChannelError> {
        self.set(property, value)
    }

    pub fn set_bool(&self, property: &str, value: bool) -> Result<(), ChannelError> {
        self.set(property, value)
    }

    // Arrays

    /// The value array at `property`. A string list reads as an array of
    /// strings; an empty array reads as `NotFound`.
    pub fn get_array(&self, property: &str) -> Result<Vec<Value>, ChannelError> {
        let items = match self.get(property, None)? {
            Value::Array(items) => items,
            Value::Strv(items) => items.into_iter().map(Value::String).collect(),
            other => {
                return Err(ConversionError::TypeMismatch { from: other.kind(), to: Kind::Array }
                    .into())
            }
        };
        if items.is_empty() {
            return Err(ChannelError::NotFound { property: self.resolve(property) });
        }
        Ok(items)
    }

    /// The array at `property` with element `i` converted to `kinds[i]`.
    ///
    /// The element count must match exactly. 16-bit kinds are narrowed from
    /// their 32-bit wire form.
    pub fn get_array_as(&self, property: &str, kinds: &[Kind]) -> Result<Vec<Value>, ChannelError> {
        let items = self.get_array(property)?;
        if items.len() != kinds.len() {
            return Err(ChannelError::Validation(format!(
                "array {property} has {} members, expected {}",
                items.len(),
                kinds.len()
            )));
        }
        items
            .into_iter()
            .zip(kinds)
            .enumerate()
            .map(|(index, (item, kind))| {
                knob_core::convert(item, *kind).map_err(|source| {
                    ChannelError::from(ConversionError::Element { index, source: Box::new(source) })
                })
            })
            .collect()
    }

    pub fn set_array(&self, property: &str, values: Vec<Value>) -> Result<(), ChannelError> {
        if values.is_empty() {
            return Err(ChannelError::Validation(format!("empty array for {property}")));
        }
        self.set(property, Value::Array(values))
    }

    pub fn get_string_list(&self, property: &str) -> Result<Vec<String>, ChannelError> {
        self.get_array(property)?
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(ChannelError::from(ConversionError::TypeMismatch {
                    from: other.kind(),
                    to: Kind::String,
                })),
            })
            .collect()
    }

    /// Store a list of strings as an array of string values.
    pub fn set_string_list<S: AsRef<str>>(
        &self,
        property: &str,
        values: &[S],
    ) -> Result<(), ChannelError> {
        if values.is_empty() {
            return Err(ChannelError::Validation(format!("empty string list for {property}")));
        }
        let items = values.iter().map(|s| Value::String(s.as_ref().to_string())).collect();
        self.set(property, Value::Array(items))
    }

    // Structs

    pub fn get_struct(
        &self,
        property: &str,
        layout: &StructLayout,
    ) -> Result<NativeStruct, ChannelError> {
        let items = self.get_array(property)?;
        Ok(unpack(items, layout)?)
    }

    pub fn set_struct(
        &self,
        property: &str,
        layout: &StructLayout,
        native: &NativeStruct,
    ) -> Result<(), ChannelError> {
        let values = pack(native, layout)?;
        self.set(property, Value::Array(values))
    }

    /// Like [`Channel::get_struct`], with a layout registered by name.
    pub fn get_named_struct(&self, property: &str, name: &str) -> Result<NativeStruct, ChannelError> {
        let layout = self.structs.lookup(name)?;
        self.get_struct(property, &layout)
    }

    pub fn set_named_struct(
        &self,
        property: &str,
        name: &str,
        native: &NativeStruct,
    ) -> Result<(), ChannelError> {
        let layout = self.structs.lookup(name)?;
        self.set_struct(property, &layout, native)
    }

    // Listeners

    /// Call `f` for every change on this channel, or only for the local
    /// property `filter` if given.
    pub fn connect(
        &self,
        filter: Option<&str>,
        f: impl Fn(&PropertyChange) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push(Listener {
            id,
            filter: filter.map(str::to_string),
            callback: Arc::new(f),
        });
        id
    }

    pub fn disconnect(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    /// Route a raw daemon event to this channel's listeners.
    ///
    /// Returns false if the event is for another channel or outside the base.
    pub fn handle_event(&self, event: &PropertyChanged) -> bool {
        let Some(local) = router::scope(&self.name, self.property_base.as_deref(), event) else {
            return false;
        };
        self.cache.apply(&event.property, event.value.as_ref());

        let change = PropertyChange {
            channel: self.name.clone(),
            property: local.to_string(),
            value: event.value.clone().map(Value::from),
        };
        debug!(channel = %self.name, property = %change.property, "property changed");

        // Callbacks run without the listener lock so they may (dis)connect.
        let targets: Vec<Callback> = self
            .listeners
            .lock()
            .iter()
            .filter(|l| match &l.filter {
                Some(filter) => *filter == change.property,
                None => true,
            })
            .map(|l| Arc::clone(&l.callback))
            .collect();
        for callback in targets {
            callback(&change);
        }
        true
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("property_base", &self.property_base)
            .field("is_singleton", &self.is_singleton)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;

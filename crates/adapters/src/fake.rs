// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing

use std::collections::{BTreeMap, HashSet};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use knob_core::path::is_under;
use knob_core::WireValue;
use knob_wire::{ErrorKind, PropertyChanged};
use parking_lot::{Mutex, MutexGuard};

use crate::transport::{Transport, TransportError};

/// Recorded transport call
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    GetProperty { channel: String, property: String },
    GetAll { channel: String, base: Option<String> },
    SetProperty { channel: String, property: String, value: WireValue },
    ResetProperty { channel: String, base: String, recursive: bool },
    ListChannels,
    IsPropertyLocked { channel: String, property: String },
    Watch,
}

#[derive(Default)]
struct FakeState {
    store: BTreeMap<String, BTreeMap<String, WireValue>>,
    locked: HashSet<(String, String)>,
    calls: Vec<TransportCall>,
    watchers: Vec<Sender<PropertyChanged>>,
    failing: bool,
    lock_queries_fail: bool,
    silent: bool,
}

/// In-memory transport that behaves like the daemon.
///
/// Sets and resets are echoed to watchers unless [`FakeTransport::set_silent`]
/// is on. Clones share state.
#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a property without emitting an event.
    pub fn insert(&self, channel: &str, property: &str, value: WireValue) {
        self.inner
            .lock()
            .store
            .entry(channel.to_string())
            .or_default()
            .insert(property.to_string(), value);
    }

    pub fn value(&self, channel: &str, property: &str) -> Option<WireValue> {
        self.inner.lock().store.get(channel).and_then(|p| p.get(property)).cloned()
    }

    pub fn lock(&self, channel: &str, property: &str) {
        self.inner.lock().locked.insert((channel.to_string(), property.to_string()));
    }

    /// Make every call fail with an internal daemon error.
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().failing = failing;
    }

    /// Make only `is_property_locked` fail.
    pub fn set_lock_queries_fail(&self, fail: bool) {
        self.inner.lock().lock_queries_fail = fail;
    }

    /// Stop echoing writes as change events.
    pub fn set_silent(&self, silent: bool) {
        self.inner.lock().silent = silent;
    }

    /// Push an event to every watcher, as if another process changed it.
    pub fn emit(&self, event: PropertyChanged) {
        self.inner.lock().broadcast(event);
    }

    /// Hang up every watch stream, as a daemon exiting would.
    pub fn close_watchers(&self) {
        self.inner.lock().watchers.clear();
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Number of recorded calls matching `pred`.
    pub fn count_calls(&self, pred: impl Fn(&TransportCall) -> bool) -> usize {
        self.inner.lock().calls.iter().filter(|c| pred(c)).count()
    }

    fn begin(&self, call: TransportCall) -> Result<MutexGuard<'_, FakeState>, TransportError> {
        let mut state = self.inner.lock();
        state.calls.push(call);
        if state.failing {
            return Err(internal("injected failure"));
        }
        Ok(state)
    }
}

impl FakeState {
    fn broadcast(&mut self, event: PropertyChanged) {
        self.watchers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn is_locked(&self, channel: &str, property: &str) -> bool {
        self.locked.contains(&(channel.to_string(), property.to_string()))
    }

    fn echo(&mut self, event: PropertyChanged) {
        if !self.silent {
            self.broadcast(event);
        }
    }
}

fn internal(message: &str) -> TransportError {
    TransportError::Remote { kind: ErrorKind::Internal, message: message.to_string() }
}

fn locked(property: &str) -> TransportError {
    TransportError::Remote { kind: ErrorKind::Locked, message: format!("{property} is locked") }
}

impl Transport for FakeTransport {
    fn get_property(
        &self,
        channel: &str,
        property: &str,
    ) -> Result<Option<WireValue>, TransportError> {
        let state = self.begin(TransportCall::GetProperty {
            channel: channel.to_string(),
            property: property.to_string(),
        })?;
        Ok(state.store.get(channel).and_then(|p| p.get(property)).cloned())
    }

    fn get_all(
        &self,
        channel: &str,
        base: Option<&str>,
    ) -> Result<BTreeMap<String, WireValue>, TransportError> {
        let state = self.begin(TransportCall::GetAll {
            channel: channel.to_string(),
            base: base.map(str::to_string),
        })?;
        let base = base.unwrap_or("/");
        Ok(state
            .store
            .get(channel)
            .map(|props| {
                props
                    .iter()
                    .filter(|(key, _)| is_under(base, key))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn set_property(
        &self,
        channel: &str,
        property: &str,
        value: WireValue,
    ) -> Result<(), TransportError> {
        let mut state = self.begin(TransportCall::SetProperty {
            channel: channel.to_string(),
            property: property.to_string(),
            value: value.clone(),
        })?;
        if state.is_locked(channel, property) {
            return Err(locked(property));
        }
        state
            .store
            .entry(channel.to_string())
            .or_default()
            .insert(property.to_string(), value.clone());
        state.echo(PropertyChanged {
            channel: channel.to_string(),
            property: property.to_string(),
            value: Some(value),
        });
        Ok(())
    }

    fn reset_property(
        &self,
        channel: &str,
        base: &str,
        recursive: bool,
    ) -> Result<(), TransportError> {
        let mut state = self.begin(TransportCall::ResetProperty {
            channel: channel.to_string(),
            base: base.to_string(),
            recursive,
        })?;
        let doomed: Vec<String> = match state.store.get(channel) {
            Some(props) if recursive => {
                props.keys().filter(|key| is_under(base, key)).cloned().collect()
            }
            Some(props) if props.contains_key(base) => vec![base.to_string()],
            _ => Vec::new(),
        };
        if let Some(path) = doomed.iter().find(|path| state.is_locked(channel, path)) {
            return Err(locked(path));
        }
        for property in doomed {
            if let Some(props) = state.store.get_mut(channel) {
                props.remove(&property);
            }
            state.echo(PropertyChanged { channel: channel.to_string(), property, value: None });
        }
        Ok(())
    }

    fn list_channels(&self) -> Result<Vec<String>, TransportError> {
        let state = self.begin(TransportCall::ListChannels)?;
        Ok(state
            .store
            .iter()
            .filter(|(_, props)| !props.is_empty())
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn is_property_locked(&self, channel: &str, property: &str) -> Result<bool, TransportError> {
        let state = self.begin(TransportCall::IsPropertyLocked {
            channel: channel.to_string(),
            property: property.to_string(),
        })?;
        if state.lock_queries_fail {
            return Err(internal("lock query failed"));
        }
        Ok(state.is_locked(channel, property))
    }

    fn watch(&self, sink: Sender<PropertyChanged>) -> Result<(), TransportError> {
        let mut state = self.begin(TransportCall::Watch)?;
        state.watchers.push(sink);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;

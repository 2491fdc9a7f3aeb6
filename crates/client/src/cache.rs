// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-channel property mirror in front of the transport.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use knob_adapters::{Transport, TransportError};
use knob_core::path::is_under;
use knob_core::WireValue;
use parking_lot::Mutex;
use tracing::debug;

/// Local mirror of one channel's properties, keyed by absolute path.
///
/// Reads are served from the mirror when possible. Writes go through to the
/// daemon and update the mirror only once the daemon accepted them, so a
/// read after a successful write sees the new value.
pub struct Cache {
    transport: Arc<dyn Transport>,
    channel: String,
    mirror: Mutex<HashMap<String, WireValue>>,
}

impl Cache {
    pub fn new(transport: Arc<dyn Transport>, channel: impl Into<String>) -> Self {
        Self { transport, channel: channel.into(), mirror: Mutex::new(HashMap::new()) }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// `Ok(None)` when the daemon has no such property.
    pub fn lookup(&self, property: &str) -> Result<Option<WireValue>, TransportError> {
        if let Some(value) = self.mirror.lock().get(property).cloned() {
            debug!(channel = %self.channel, property, "cache hit");
            return Ok(Some(value));
        }
        debug!(channel = %self.channel, property, "cache miss");
        let Some(fetched) = self.transport.get_property(&self.channel, property)? else {
            return Ok(None);
        };
        // A write or event that landed during the fetch is newer than the fetch.
        let mut mirror = self.mirror.lock();
        Ok(Some(mirror.entry(property.to_string()).or_insert(fetched).clone()))
    }

    pub fn set(&self, property: &str, value: WireValue) -> Result<(), TransportError> {
        self.transport.set_property(&self.channel, property, value.clone())?;
        self.mirror.lock().insert(property.to_string(), value);
        Ok(())
    }

    pub fn reset(&self, base: &str, recursive: bool) -> Result<(), TransportError> {
        self.transport.reset_property(&self.channel, base, recursive)?;
        let mut mirror = self.mirror.lock();
        if recursive {
            mirror.retain(|path, _| !is_under(base, path));
        } else {
            mirror.remove(base);
        }
        Ok(())
    }

    /// Load everything under `base` into the mirror; returns how many
    /// properties were loaded.
    pub fn prefetch(&self, base: Option<&str>) -> Result<usize, TransportError> {
        let properties = self.transport.get_all(&self.channel, base)?;
        let count = properties.len();
        self.mirror.lock().extend(properties);
        debug!(channel = %self.channel, base = base.unwrap_or("/"), count, "prefetched");
        Ok(count)
    }

    /// Fetch everything under `base` from the daemon, refreshing the mirror.
    pub fn get_all(
        &self,
        base: Option<&str>,
    ) -> Result<BTreeMap<String, WireValue>, TransportError> {
        let properties = self.transport.get_all(&self.channel, base)?;
        self.mirror.lock().extend(properties.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(properties)
    }

    pub fn is_locked(&self, property: &str) -> Result<bool, TransportError> {
        self.transport.is_property_locked(&self.channel, property)
    }

    /// Fold a change event for this channel into the mirror.
    pub fn apply(&self, property: &str, value: Option<&WireValue>) {
        let mut mirror = self.mirror.lock();
        match value {
            Some(value) => {
                mirror.insert(property.to_string(), value.clone());
            }
            None => {
                mirror.remove(property);
            }
        }
    }

    /// Number of mirrored properties.
    pub fn len(&self) -> usize {
        self.mirror.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key/value settings facade over a private channel.
//!
//! Change notifications are attributed by the [`SubscriptionTable`]: an
//! echo of our own write carries the writer's origin tag, anything else
//! must match a subscribed prefix.

use std::sync::Arc;

use knob_core::{Kind, Value};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::channel::{Channel, ListenerId, PropertyChange};
use crate::error::ChannelError;
use crate::registry::Registry;
use crate::router::{OriginTag, Route, SubscriptionTable};

/// A settings key changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsChange {
    pub key: String,
    /// Set when the change is the echo of a local write or reset.
    pub origin: Option<OriginTag>,
}

type Handler = Arc<dyn Fn(&SettingsChange) + Send + Sync>;

#[derive(Default)]
struct Shared {
    table: Mutex<SubscriptionTable>,
    handlers: Mutex<Vec<Handler>>,
}

impl Shared {
    fn route(&self, change: &PropertyChange) {
        let route = self.table.lock().route(&change.property);
        let origin = match route {
            Route::Origin(tag) => Some(tag),
            Route::Prefix(prefix) => {
                debug!(key = %change.property, %prefix, "subscribed change");
                None
            }
            Route::Unexpected => {
                warn!(key = %change.property, "changed property not expected");
                return;
            }
        };
        let notice = SettingsChange { key: change.property.clone(), origin };
        let handlers: Vec<Handler> = self.handlers.lock().iter().cloned().collect();
        for handler in handlers {
            handler(&notice);
        }
    }
}

pub struct SettingsBackend {
    channel: Arc<Channel>,
    shared: Arc<Shared>,
    listener: ListenerId,
}

impl SettingsBackend {
    /// A backend on a fresh private channel named after `program`.
    pub fn new(registry: &Registry, program: &str) -> Self {
        Self::with_channel(registry.create(program))
    }

    pub fn with_channel(channel: Arc<Channel>) -> Self {
        let shared = Arc::new(Shared::default());
        let router = Arc::clone(&shared);
        let listener = channel.connect(None, move |change| router.route(change));
        Self { channel, shared, listener }
    }

    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    /// Receive `(key, origin)` notifications.
    pub fn on_changed(&self, f: impl Fn(&SettingsChange) + Send + Sync + 'static) {
        self.shared.handlers.lock().push(Arc::new(f));
    }

    /// The stored value for `key`, if it has the `expected` kind.
    ///
    /// With `default_value` set the caller wants its own default, so nothing
    /// is read.
    pub fn read(&self, key: &str, expected: Kind, default_value: bool) -> Option<Value> {
        if default_value {
            return None;
        }
        let value = match self.channel.get(key, None) {
            Ok(value) => value,
            Err(ChannelError::NotFound { .. }) => return None,
            Err(e) => {
                warn!(key, error = %e, "settings read failed");
                return None;
            }
        };
        if value.kind() != expected {
            warn!(key, expected = %expected, found = %value.kind(), "settings value has wrong type");
            return None;
        }
        Some(value)
    }

    /// Write `key`, tagging the resulting change with `origin`.
    pub fn write(&self, key: &str, value: Value, origin: OriginTag) -> Result<(), ChannelError> {
        self.shared.table.lock().note_write(key, origin);
        let result = self.channel.set(key, value);
        if result.is_err() {
            self.shared.table.lock().forget_write(key);
        }
        result
    }

    /// Reset `key` and everything under it.
    pub fn reset(&self, key: &str, origin: OriginTag) -> Result<(), ChannelError> {
        self.shared.table.lock().note_write(key, origin);
        let result = self.channel.reset(key, true);
        if result.is_err() {
            self.shared.table.lock().forget_write(key);
        }
        result
    }

    pub fn is_writable(&self, key: &str) -> bool {
        !self.channel.is_locked(key)
    }

    pub fn subscribe(&self, prefix: &str) {
        self.shared.table.lock().subscribe(prefix);
    }

    pub fn unsubscribe(&self, prefix: &str) {
        debug!(prefix, "unsubscribe");
        self.shared.table.lock().unsubscribe(prefix);
    }
}

impl Drop for SettingsBackend {
    fn drop(&mut self) {
        self.channel.disconnect(self.listener);
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

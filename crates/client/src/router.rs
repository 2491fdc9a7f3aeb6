// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change-event routing.
//!
//! [`scope`] decides whether a raw daemon event belongs to a channel and
//! what it is called there. [`SubscriptionTable`] adds the settings-bridge
//! layer on top: one-shot pending-write tags first, prefix subscriptions
//! second.

use std::collections::HashMap;

use knob_core::path::strip_base;
use knob_wire::PropertyChanged;

/// Re-scope a raw event for the channel `name` with `base`.
///
/// Returns the channel-local property, or `None` when the event belongs to
/// another channel or lies outside the base.
pub fn scope<'a>(name: &str, base: Option<&str>, event: &'a PropertyChanged) -> Option<&'a str> {
    if event.channel != name {
        return None;
    }
    strip_base(base, &event.property)
}

/// Opaque marker identifying who issued a local write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OriginTag(pub u64);

/// Where a settings change event was attributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Echo of our own write; the pending entry was consumed.
    Origin(OriginTag),
    /// Matched a subscribed prefix.
    Prefix(String),
    /// Nobody asked for it.
    Unexpected,
}

/// Pending local writes and prefix subscriptions.
#[derive(Debug, Default)]
pub struct SubscriptionTable {
    pending: HashMap<String, OriginTag>,
    prefixes: Vec<String>,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `path` is about to be written by `origin`. Replaces any
    /// earlier entry for the same path.
    pub fn note_write(&mut self, path: &str, origin: OriginTag) {
        self.pending.insert(path.to_string(), origin);
    }

    /// Drop the pending entry for a write that failed.
    pub fn forget_write(&mut self, path: &str) -> Option<OriginTag> {
        self.pending.remove(path)
    }

    pub fn is_pending(&self, path: &str) -> bool {
        self.pending.contains_key(path)
    }

    /// Subscribing twice to the same prefix is a no-op.
    pub fn subscribe(&mut self, prefix: &str) {
        if !self.prefixes.iter().any(|p| p == prefix) {
            self.prefixes.push(prefix.to_string());
        }
    }

    pub fn unsubscribe(&mut self, prefix: &str) -> bool {
        let before = self.prefixes.len();
        self.prefixes.retain(|p| p != prefix);
        self.prefixes.len() != before
    }

    /// Attribute a change to `path`.
    ///
    /// A pending write wins and is consumed; otherwise the first subscribed
    /// prefix that is a literal prefix of `path` matches.
    pub fn route(&mut self, path: &str) -> Route {
        if let Some(origin) = self.pending.remove(path) {
            return Route::Origin(origin);
        }
        self.prefixes
            .iter()
            .find(|prefix| path.starts_with(prefix.as_str()))
            .map(|prefix| Route::Prefix(prefix.clone()))
            .unwrap_or(Route::Unexpected)
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-scoped channel registry and change-event dispatch.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Weak};

use knob_adapters::Transport;
use knob_core::{NamedStructs, StructLayout};
use knob_wire::PropertyChanged;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::channel::Channel;
use crate::error::ChannelError;

/// Owns singleton channels and fans daemon events out to every channel it
/// created.
///
/// Build one per process and share it by `Arc`.
pub struct Registry {
    transport: Arc<dyn Transport>,
    singletons: Mutex<HashMap<String, Arc<Channel>>>,
    /// Every channel handed out, in creation order, for event dispatch.
    channels: Mutex<Vec<Weak<Channel>>>,
    structs: Arc<NamedStructs>,
    events: Mutex<Option<Receiver<PropertyChanged>>>,
}

impl Registry {
    pub fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        Arc::new(Self {
            transport,
            singletons: Mutex::new(HashMap::new()),
            channels: Mutex::new(Vec::new()),
            structs: Arc::new(NamedStructs::new()),
            events: Mutex::new(None),
        })
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// The shared channel for `name`, created on first use.
    ///
    /// Concurrent callers for the same name always get the same instance.
    pub fn get(&self, name: &str) -> Arc<Channel> {
        let channel = {
            let mut singletons = self.singletons.lock();
            match singletons.get(name) {
                Some(channel) => Arc::clone(channel),
                None => {
                    let channel = self.build(name, None, true);
                    singletons.insert(name.to_string(), Arc::clone(&channel));
                    channel
                }
            }
        };
        channel.warm();
        channel
    }

    /// A private channel; dropped with its last reference.
    pub fn create(&self, name: &str) -> Arc<Channel> {
        self.create_with_base(name, None)
    }

    /// A private channel scoped to `base`.
    pub fn create_with_base(&self, name: &str, base: Option<&str>) -> Arc<Channel> {
        let channel = self.build(name, base, false);
        channel.warm();
        channel
    }

    fn build(&self, name: &str, base: Option<&str>, singleton: bool) -> Arc<Channel> {
        let channel = Arc::new(Channel::new(
            Arc::clone(&self.transport),
            name,
            base,
            singleton,
            Arc::clone(&self.structs),
        ));
        let mut channels = self.channels.lock();
        channels.retain(|weak| weak.strong_count() > 0);
        channels.push(Arc::downgrade(&channel));
        debug!(channel = name, base, singleton, "channel created");
        channel
    }

    pub fn list_channels(&self) -> Result<Vec<String>, ChannelError> {
        Ok(self.transport.list_channels()?)
    }

    /// Bind `name` to a struct layout. A name can only be bound once.
    pub fn register_struct(&self, name: &str, layout: StructLayout) -> Result<(), ChannelError> {
        Ok(self.structs.register(name, layout)?)
    }

    pub fn lookup_struct(&self, name: &str) -> Result<Arc<StructLayout>, ChannelError> {
        Ok(self.structs.lookup(name)?)
    }

    /// Subscribe to the daemon's change stream. Events queue up until
    /// dispatched.
    pub fn watch(&self) -> Result<(), ChannelError> {
        let (tx, rx) = mpsc::channel();
        self.transport.watch(tx)?;
        *self.events.lock() = Some(rx);
        Ok(())
    }

    /// Deliver one event to every live channel, in creation order.
    ///
    /// Returns how many channels accepted it.
    pub fn dispatch(&self, event: &PropertyChanged) -> usize {
        let live: Vec<Arc<Channel>> =
            self.channels.lock().iter().filter_map(Weak::upgrade).collect();
        let delivered = live.iter().filter(|channel| channel.handle_event(event)).count();
        debug!(
            channel = %event.channel,
            property = %event.property,
            delivered,
            "dispatched change"
        );
        delivered
    }

    /// Dispatch every queued event on the calling thread; returns the count.
    pub fn dispatch_pending(&self) -> usize {
        let queued: Vec<PropertyChanged> = match self.events.lock().as_ref() {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in &queued {
            self.dispatch(event);
        }
        queued.len()
    }

    /// Block and dispatch events until the change stream closes.
    pub fn run_dispatch(&self) -> Result<(), ChannelError> {
        let Some(rx) = self.events.lock().take() else {
            return Err(ChannelError::Validation("registry is not watching".to_string()));
        };
        for event in rx.iter() {
            self.dispatch(&event);
        }
        info!("change stream closed");
        Ok(())
    }

    /// Release every singleton channel. Private channels are unaffected.
    pub fn shutdown(&self) {
        let released = {
            let mut singletons = self.singletons.lock();
            let count = singletons.len();
            singletons.clear();
            count
        };
        if released > 0 {
            info!(released, "registry shut down");
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! knob-client: channels, their property caches, and change routing
//!
//! Applications build one [`Registry`] over a [`knob_adapters::Transport`]
//! and obtain [`Channel`]s from it. Change events from the daemon are queued
//! by [`Registry::watch`] and delivered to channel listeners by
//! [`Registry::dispatch_pending`] or [`Registry::run_dispatch`].

pub mod cache;
pub mod channel;
pub mod error;
pub mod registry;
pub mod router;
pub mod settings;

pub use cache::Cache;
pub use channel::{Channel, ListenerId, PropertyChange};
pub use error::ChannelError;
pub use registry::Registry;
pub use router::{OriginTag, Route, SubscriptionTable};
pub use settings::{SettingsBackend, SettingsChange};

pub use knob_core::{Kind, NativeStruct, StructLayout, Value};

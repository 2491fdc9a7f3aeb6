// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use knob_core::WireValue;
use serde::{Deserialize, Serialize};

/// Request from a client to the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Names of every channel the daemon knows about
    ListChannels,

    /// Read one property by absolute path
    GetProperty { channel: String, property: String },

    /// Read every property under `base` (`None` = whole channel)
    GetAllProperties {
        channel: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base: Option<String>,
    },

    /// Store a property value
    SetProperty { channel: String, property: String, value: WireValue },

    /// Remove a property, or a whole subtree when `recursive`
    ResetProperty {
        channel: String,
        base: String,
        #[serde(default)]
        recursive: bool,
    },

    /// Ask whether an administrator has locked a property
    IsPropertyLocked { channel: String, property: String },

    /// Upgrade the connection to a stream of `Response::Changed`
    Watch,
}

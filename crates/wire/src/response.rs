// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;

use knob_core::WireValue;
use serde::{Deserialize, Serialize};

/// Response from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success
    Ok,

    /// Health check response
    Pong,

    /// Version handshake response
    Hello { version: String },

    /// Known channel names
    Channels { channels: Vec<String> },

    /// Single property (`None` = not set)
    Property { value: Option<WireValue> },

    /// Properties keyed by absolute path
    Properties { properties: BTreeMap<String, WireValue> },

    /// Lock state of a property
    Locked { locked: bool },

    /// Change notification pushed on a watch connection
    Changed(PropertyChanged),

    /// Request failed
    Error { kind: ErrorKind, message: String },
}

/// A property changed (or was removed) somewhere in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyChanged {
    pub channel: String,
    pub property: String,
    /// New value; `None` means the property was reset.
    #[serde(default)]
    pub value: Option<WireValue>,
}

/// Failure category reported by the daemon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Locked,
    InvalidProperty,
    InvalidChannel,
    Internal,
}

impl Response {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Response::Error { kind, message: message.into() }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::Locked => "locked",
            ErrorKind::InvalidProperty => "invalid property",
            ErrorKind::InvalidChannel => "invalid channel",
            ErrorKind::Internal => "internal",
        })
    }
}

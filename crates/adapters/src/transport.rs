// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The contract a channel needs from whatever talks to the daemon.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use knob_core::WireValue;
use knob_wire::{ErrorKind, PropertyChanged, ProtocolError};
use thiserror::Error;

/// Errors from daemon calls
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not determine daemon socket path")]
    NoSocketPath,

    #[error("cannot connect to daemon at {path}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("daemon error ({kind}): {message}")]
    Remote { kind: ErrorKind, message: String },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("runtime error: {0}")]
    Runtime(std::io::Error),
}

impl TransportError {
    /// The daemon refused because an administrator locked the property.
    pub fn is_locked(&self) -> bool {
        matches!(self, TransportError::Remote { kind: ErrorKind::Locked, .. })
    }
}

/// Synchronous calls into the configuration daemon.
///
/// Every call blocks the calling thread until the daemon replies. Paths are
/// absolute within the channel.
pub trait Transport: Send + Sync + 'static {
    /// `Ok(None)` when the property is not set.
    fn get_property(&self, channel: &str, property: &str)
        -> Result<Option<WireValue>, TransportError>;

    /// Every property at or under `base` (`None` = whole channel), keyed by
    /// absolute path.
    fn get_all(
        &self,
        channel: &str,
        base: Option<&str>,
    ) -> Result<BTreeMap<String, WireValue>, TransportError>;

    fn set_property(
        &self,
        channel: &str,
        property: &str,
        value: WireValue,
    ) -> Result<(), TransportError>;

    fn reset_property(&self, channel: &str, base: &str, recursive: bool)
        -> Result<(), TransportError>;

    fn list_channels(&self) -> Result<Vec<String>, TransportError>;

    fn is_property_locked(&self, channel: &str, property: &str) -> Result<bool, TransportError>;

    /// Start delivering change events into `sink`, in arrival order.
    ///
    /// Delivery stops once the receiving side is dropped.
    fn watch(&self, sink: Sender<PropertyChanged>) -> Result<(), TransportError>;
}

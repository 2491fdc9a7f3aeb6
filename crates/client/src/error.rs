// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use knob_adapters::TransportError;
use knob_core::{ConversionError, LayoutError, NamedStructError};
use thiserror::Error;

/// Errors from channel operations
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("property \"{property}\" does not exist")]
    NotFound { property: String },

    #[error(transparent)]
    TypeMismatch(#[from] ConversionError),

    #[error("{0}")]
    Validation(String),

    #[error("property \"{property}\" is locked")]
    Locked { property: String },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl ChannelError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChannelError::NotFound { .. })
    }

    /// Map a failed write, turning a daemon-side lock refusal into `Locked`.
    pub(crate) fn from_write(e: TransportError, property: &str) -> Self {
        if e.is_locked() {
            ChannelError::Locked { property: property.to_string() }
        } else {
            ChannelError::Transport(e)
        }
    }
}

impl From<LayoutError> for ChannelError {
    fn from(e: LayoutError) -> Self {
        match e {
            LayoutError::Member { index, source } => ChannelError::TypeMismatch(
                ConversionError::Element { index, source: Box::new(source) },
            ),
            other => ChannelError::Validation(other.to_string()),
        }
    }
}

impl From<NamedStructError> for ChannelError {
    fn from(e: NamedStructError) -> Self {
        ChannelError::Validation(e.to_string())
    }
}

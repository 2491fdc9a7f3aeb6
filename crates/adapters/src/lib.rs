// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! knob-adapters: the daemon transport seam and its implementations

pub mod env;
pub mod socket;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod daemon;
#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use socket::SocketTransport;
pub use transport::{Transport, TransportError};

#[cfg(any(test, feature = "test-support"))]
pub use daemon::MemoryDaemon;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTransport, TransportCall};

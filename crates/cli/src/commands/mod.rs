// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod channels;
pub mod get;
pub mod list;
pub mod locked;
pub mod reset;
pub mod set;
pub mod watch;

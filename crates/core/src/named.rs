// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Struct layouts registered under a name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::layout::StructLayout;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamedStructError {
    #[error("struct \"{0}\" is already registered")]
    AlreadyRegistered(String),

    #[error("struct \"{0}\" is not registered")]
    NotRegistered(String),
}

/// Name → layout table. A name can be bound once.
#[derive(Debug, Default)]
pub struct NamedStructs {
    inner: RwLock<HashMap<String, Arc<StructLayout>>>,
}

impl NamedStructs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str, layout: StructLayout) -> Result<(), NamedStructError> {
        let mut inner = self.inner.write();
        if inner.contains_key(name) {
            return Err(NamedStructError::AlreadyRegistered(name.to_string()));
        }
        inner.insert(name.to_string(), Arc::new(layout));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<StructLayout>, NamedStructError> {
        self.inner
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| NamedStructError::NotRegistered(name.to_string()))
    }
}

#[cfg(test)]
#[path = "named_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prefix-table router

use super::RigRouter;
use std::collections::HashMap;
use std::sync::Arc;

/// Router over an explicit prefix -> rig table from configuration.
///
/// The table is a closed set loaded once at startup; there is no
/// runtime registration.
#[derive(Clone, Default)]
pub struct PrefixRouter {
    rigs: Arc<HashMap<String, String>>,
}

impl PrefixRouter {
    pub fn new(rigs: HashMap<String, String>) -> Self {
        Self {
            rigs: Arc::new(rigs),
        }
    }
}

impl RigRouter for PrefixRouter {
    fn resolve_rig(&self, prefix: &str) -> Option<String> {
        if prefix.is_empty() {
            return None;
        }
        self.rigs
            .get(prefix)
            .filter(|rig| !rig.is_empty())
            .cloned()
    }
}

#[cfg(test)]
#[path = "prefix_tests.rs"]
mod tests;

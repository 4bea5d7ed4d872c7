// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rig routing
//!
//! Maps an issue-id prefix to the rig whose worker pool should receive
//! the issue. Routing is pure table lookup; a miss is a per-candidate
//! condition, never fatal.

mod prefix;

pub use prefix::PrefixRouter;

/// Resolves an issue-id prefix to a target rig name.
pub trait RigRouter: Clone + Send + Sync + 'static {
    /// The rig for a prefix, or `None` for unknown/unmapped prefixes.
    fn resolve_rig(&self, prefix: &str) -> Option<String>;
}

// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::sync::atomic::{AtomicU64, Ordering};

/// Identity of the object a listener is bound to.
///
/// Listeners are invoked with their context passed explicitly, and
/// [`unregister`](crate::EventRouter::unregister) / [`clear`](crate::EventRouter::clear)
/// match on it. Routers, handlers and controls each mint one with
/// [`ContextId::next`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

static NEXT_CONTEXT: AtomicU64 = AtomicU64::new(1);

impl ContextId {
    /// A fresh, process-unique context.
    pub fn next() -> Self {
        Self(NEXT_CONTEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// A context with a caller-chosen raw value.
    ///
    /// Values minted here are not coordinated with [`ContextId::next`].
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

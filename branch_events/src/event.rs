// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The payload handed to application listeners.

use branch_dom::{NativeEvent, NodeId};
use kurbo::Point;

use crate::context::ContextId;

/// An application event as seen by listeners.
///
/// [`EventRouter::dispatch`](crate::EventRouter::dispatch) stamps `object`,
/// `element` and (when unset) `kind` before running listeners. Events
/// translated from native input borrow the native event so listeners can
/// cancel it.
#[derive(Debug, Default)]
pub struct Event<'a> {
    /// Owner of the router that dispatched the event.
    pub object: Option<ContextId>,
    /// Node the dispatching router is attached to.
    pub element: Option<NodeId>,
    /// Channel name; filled from the dispatch channel when unset.
    pub kind: Option<String>,
    /// The underlying native event, for translated input.
    pub native: Option<&'a mut NativeEvent>,
    /// Pointer position relative to `element`, when the router computes it.
    pub xy: Option<Point>,
    /// Page-relative pointer position, filled by gesture handlers.
    pub xypage: Option<Point>,
}

impl<'a> Event<'a> {
    /// An empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// A payload wrapping a native event.
    pub fn from_native(native: &'a mut NativeEvent) -> Self {
        Self {
            kind: Some(native.kind.as_str().to_owned()),
            native: Some(native),
            ..Self::default()
        }
    }

    /// Sets the event type.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// The event type, if stamped.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Stop the native event, if any.
    ///
    /// See [`NativeEvent::stop`].
    pub fn stop(&mut self, allow_default: bool) {
        if let Some(native) = self.native.as_deref_mut() {
            native.stop(allow_default);
        }
    }
}

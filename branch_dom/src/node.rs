// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node handles and the per-node geometry the event core consumes.

use kurbo::{Size, Vec2};
use smallvec::SmallVec;

use crate::event::EventType;
use crate::listener::NativeCallback;

/// Identifier for a node in a [`Document`](crate::Document).
///
/// This is a small, copyable handle that stays stable for the lifetime of the
/// node but becomes invalid once the node is removed.
/// It consists of a slot index and a generation counter.
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a
/// `NodeId` still refers to a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// CSS `position` of an element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Position {
    /// Normal flow.
    #[default]
    Static,
    /// Offset from its normal-flow position.
    Relative,
    /// Positioned against the nearest positioned ancestor.
    Absolute,
    /// Positioned against the viewport.
    Fixed,
}

impl Position {
    /// Whether the element establishes an offset parent for its descendants.
    pub const fn is_positioned(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// Layout-facing description of an element.
///
/// Pass one to [`Document::append`](crate::Document::append) to create a
/// node, and mutate it later through
/// [`Document::update`](crate::Document::update).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    /// DOM `id` attribute, if any.
    pub dom_id: Option<String>,
    /// `offsetLeft`/`offsetTop` relative to the offset parent.
    pub offset: Vec2,
    /// Explicit offset parent; when `None` the nearest positioned ancestor
    /// (or the body) is used.
    pub offset_parent: Option<NodeId>,
    /// `scrollLeft`/`scrollTop`.
    pub scroll: Vec2,
    /// Border-box size.
    pub size: Size,
    /// CSS `position`.
    pub position: Position,
    /// CSS class names.
    pub classes: SmallVec<[String; 2]>,
}

impl Element {
    /// An element at `offset` with the given `size`.
    pub fn at(offset: Vec2, size: Size) -> Self {
        Self {
            offset,
            size,
            ..Self::default()
        }
    }

    /// Sets the DOM `id`.
    #[must_use]
    pub fn with_dom_id(mut self, id: impl Into<String>) -> Self {
        self.dom_id = Some(id.into());
        self
    }

    /// Sets the CSS `position`.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Sets the scroll offsets.
    #[must_use]
    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = scroll;
        self
    }

    /// Sets an explicit offset parent.
    #[must_use]
    pub fn with_offset_parent(mut self, parent: NodeId) -> Self {
        self.offset_parent = Some(parent);
        self
    }

    /// Whether the element carries `name` in its class list.
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }
}

/// A native listener registration living on a node.
#[derive(Clone)]
pub(crate) struct NativeRegistration {
    pub(crate) kind: EventType,
    pub(crate) callback: NativeCallback,
    pub(crate) capture: bool,
}

impl core::fmt::Debug for NativeRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeRegistration")
            .field("kind", &self.kind)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

/// Storage slot for one node.
#[derive(Clone, Debug, Default)]
pub(crate) struct NodeSlot {
    pub(crate) generation: u32,
    pub(crate) alive: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) element: Element,
    pub(crate) native: SmallVec<[NativeRegistration; 4]>,
}

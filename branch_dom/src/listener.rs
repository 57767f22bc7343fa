// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener cache: the registry of native subscriptions, bucketed per element.
//!
//! Every native listener the toolkit installs goes through a
//! [`ListenerCache`]. The cache assigns each observed node an
//! [`ElementIdentity`] the first time it sees it and records every
//! `(node, event, callback, capture)` tuple under that identity, which gives
//! two guarantees:
//!
//! - exactly one native registration exists per unique tuple, however often
//!   it is attached;
//! - a node's subscriptions can be torn down in bulk without the caller
//!   remembering what it attached ([`ListenerCache::detach_all`]).
//!
//! The cache does not talk to a host directly. Native registration goes
//! through the [`NativeTarget`] seam, which [`Document`](crate::Document)
//! implements for its node table; most code should use the `observe` family
//! of methods on the document instead of driving the cache by hand.
//!
//! ## Minimal example
//!
//! ```
//! use branch_dom::{Document, Element, EventType, native_callback};
//!
//! let doc = Document::new();
//! let div = doc.append(doc.body(), Element::default()).unwrap();
//! let cb = native_callback(|ev| ev.stop(true));
//!
//! doc.observe(div, EventType::Click, cb.clone(), false).unwrap();
//! // Attaching the same tuple again does not create a second registration.
//! doc.observe(div, EventType::Click, cb.clone(), false).unwrap();
//! assert_eq!(doc.subscription_count(div), 1);
//!
//! assert!(doc.stop_observing(div, EventType::Click, &cb, false));
//! assert!(!doc.stop_observing(div, EventType::Click, &cb, false));
//! ```

use core::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::event::{EventType, NativeEvent};
use crate::node::NodeId;

/// A native listener callback.
///
/// Identity is pointer identity: two callbacks are "the same" listener only
/// when they are clones of one `Rc`.
pub type NativeCallback = Rc<dyn Fn(&mut NativeEvent)>;

/// Wrap a closure as a [`NativeCallback`].
pub fn native_callback<F>(f: F) -> NativeCallback
where
    F: Fn(&mut NativeEvent) + 'static,
{
    Rc::new(f)
}

/// Opaque, stable identity assigned to a node on first observation.
///
/// Used only as a lookup key; it survives any number of attach/detach cycles
/// and is forgotten when the node is removed from its document.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementIdentity(u32);

impl ElementIdentity {
    /// The raw serial number.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Engine quirks that change how listeners are registered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    /// The engine does not report non-printable keys through `keypress`;
    /// register `keydown` instead.
    pub keypress_as_keydown: bool,
}

impl Quirks {
    /// The native event name actually used for `kind`.
    pub const fn native_kind(self, kind: EventType) -> EventType {
        match kind {
            EventType::KeyPress if self.keypress_as_keydown => EventType::KeyDown,
            other => other,
        }
    }
}

/// One recorded native subscription.
#[derive(Clone)]
pub struct Subscription {
    /// Observed node.
    pub node: NodeId,
    /// Native event type (after quirk remapping).
    pub kind: EventType,
    /// The registered callback.
    pub callback: NativeCallback,
    /// Whether the callback runs in the capture phase.
    pub capture: bool,
}

impl Subscription {
    fn matches(&self, kind: EventType, callback: &NativeCallback, capture: bool) -> bool {
        self.kind == kind && self.capture == capture && Rc::ptr_eq(&self.callback, callback)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("node", &self.node)
            .field("kind", &self.kind)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

/// Host side of native registration.
pub trait NativeTarget {
    /// Install `callback` for `kind` on `node`.
    fn add_native(&mut self, node: NodeId, kind: EventType, callback: &NativeCallback, capture: bool);

    /// Remove a registration previously installed with [`add_native`](Self::add_native).
    ///
    /// Returns `false` when the registration can no longer be removed, for
    /// example because the node is gone.
    fn remove_native(
        &mut self,
        node: NodeId,
        kind: EventType,
        callback: &NativeCallback,
        capture: bool,
    ) -> bool;
}

#[derive(Clone, Debug)]
struct Identity {
    id: ElementIdentity,
    label: String,
}

/// Registry of native subscriptions keyed by element identity.
#[derive(Default)]
pub struct ListenerCache {
    quirks: Quirks,
    identities: HashMap<NodeId, Identity>,
    observers: HashMap<ElementIdentity, SmallVec<[Subscription; 4]>>,
    next_identity: u32,
}

impl fmt::Debug for ListenerCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerCache")
            .field("quirks", &self.quirks)
            .field("identities", &self.identities.len())
            .field(
                "subscriptions",
                &self.observers.values().map(SmallVec::len).sum::<usize>(),
            )
            .finish_non_exhaustive()
    }
}

impl ListenerCache {
    /// An empty cache.
    pub fn new(quirks: Quirks) -> Self {
        Self {
            quirks,
            ..Self::default()
        }
    }

    /// The engine quirks in effect.
    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// The identity of `node`, if it has ever been observed.
    pub fn identity(&self, node: NodeId) -> Option<ElementIdentity> {
        self.identities.get(&node).map(|i| i.id)
    }

    /// The debugging label of `node`'s identity, if assigned.
    pub fn identity_label(&self, node: NodeId) -> Option<&str> {
        self.identities.get(&node).map(|i| i.label.as_str())
    }

    fn identity_for(&mut self, node: NodeId, dom_id: Option<&str>) -> ElementIdentity {
        if let Some(existing) = self.identities.get(&node) {
            return existing.id;
        }
        self.next_identity += 1;
        let id = ElementIdentity(self.next_identity);
        let label = match dom_id {
            Some(prefix) => format!("{prefix}_eventCacheID_{}", id.0),
            None => format!("eventCacheID_{}", id.0),
        };
        tracing::trace!(?node, %label, "assigned element identity");
        self.identities.insert(node, Identity { id, label });
        id
    }

    /// Record and natively register `callback` for `kind` on `node`.
    ///
    /// Attaching a tuple that is already registered returns the existing
    /// subscription and leaves the native registration untouched.
    pub fn attach(
        &mut self,
        target: &mut impl NativeTarget,
        node: NodeId,
        dom_id: Option<&str>,
        kind: EventType,
        callback: NativeCallback,
        capture: bool,
    ) -> Subscription {
        let kind = self.quirks.native_kind(kind);
        let id = self.identity_for(node, dom_id);
        let bucket = self.observers.entry(id).or_default();
        if let Some(existing) = bucket.iter().find(|s| s.matches(kind, &callback, capture)) {
            return existing.clone();
        }
        target.add_native(node, kind, &callback, capture);
        let sub = Subscription {
            node,
            kind,
            callback,
            capture,
        };
        bucket.push(sub.clone());
        tracing::trace!(?node, %kind, capture, "attached native listener");
        sub
    }

    /// Remove the matching subscription and its native registration.
    ///
    /// Returns whether a matching record was found.
    pub fn detach(
        &mut self,
        target: &mut impl NativeTarget,
        node: NodeId,
        kind: EventType,
        callback: &NativeCallback,
        capture: bool,
    ) -> bool {
        let kind = self.quirks.native_kind(kind);
        let Some(id) = self.identity(node) else {
            return false;
        };
        let Some(bucket) = self.observers.get_mut(&id) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|s| s.matches(kind, callback, capture)) else {
            return false;
        };
        let sub = bucket.remove(pos);
        if bucket.is_empty() {
            self.observers.remove(&id);
        }
        if !target.remove_native(node, kind, &sub.callback, capture) {
            tracing::trace!(?node, %kind, "native listener already gone");
        }
        tracing::trace!(?node, %kind, capture, "detached native listener");
        true
    }

    /// Detach every subscription recorded for `node`, newest first.
    ///
    /// Returns the number of subscriptions removed.
    pub fn detach_all(&mut self, target: &mut impl NativeTarget, node: NodeId) -> usize {
        let Some(id) = self.identity(node) else {
            return 0;
        };
        let Some(bucket) = self.observers.remove(&id) else {
            return 0;
        };
        let count = bucket.len();
        for sub in bucket.iter().rev() {
            // Removal can fail for nodes that are already gone; that is fine.
            let _ = target.remove_native(sub.node, sub.kind, &sub.callback, sub.capture);
        }
        tracing::debug!(?node, count, "detached all native listeners");
        count
    }

    /// Detach everything for every node.
    pub fn unload(&mut self, target: &mut impl NativeTarget) -> usize {
        let nodes: Vec<NodeId> = self.identities.keys().copied().collect();
        nodes
            .into_iter()
            .map(|node| self.detach_all(target, node))
            .sum()
    }

    /// Drop `node`'s identity after tearing down its subscriptions.
    pub fn forget(&mut self, target: &mut impl NativeTarget, node: NodeId) -> usize {
        let count = self.detach_all(target, node);
        self.identities.remove(&node);
        count
    }

    /// The subscriptions recorded for `node`, oldest first.
    pub fn subscriptions(&self, node: NodeId) -> &[Subscription] {
        self.identity(node)
            .and_then(|id| self.observers.get(&id))
            .map_or(&[], |bucket| bucket.as_slice())
    }

    /// Number of subscriptions recorded for `node`.
    pub fn subscription_count(&self, node: NodeId) -> usize {
        self.subscriptions(node).len()
    }

    /// Whether any subscription for `kind` is recorded on `node`.
    pub fn is_observed(&self, node: NodeId, kind: EventType) -> bool {
        let kind = self.quirks.native_kind(kind);
        self.subscriptions(node).iter().any(|s| s.kind == kind)
    }
}

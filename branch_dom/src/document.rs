// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document host: node arena, geometry queries and native event delivery.
//!
//! ## Layout of a document
//!
//! Every [`Document`] starts with three nodes:
//!
//! - [`window`](Document::window): target of viewport `scroll` and `unload`
//!   events; not part of the tree.
//! - [`document_node`](Document::document_node): root of the tree. Its scroll
//!   offsets are the viewport scroll.
//! - [`body`](Document::body): child of the document node and the default
//!   offset parent.
//!
//! ## Delivery
//!
//! [`Document::fire`] delivers a native event along the target's ancestor
//! path: capture registrations from the root down to the target, then bubble
//! registrations from the target back up (bubbling only for event types that
//! bubble). Stopping propagation finishes the current node and skips the
//! rest. Registrations are snapshotted per node, so callbacks may attach and
//! detach listeners freely.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::{Point, Size, Vec2};
//! use branch_dom::{Document, Element, EventType, NativeEvent, native_callback};
//!
//! let doc = Document::new();
//! let div = doc.append(doc.body(), Element::at(Vec2::new(10.0, 10.0), Size::new(50.0, 50.0))).unwrap();
//! let hits = Rc::new(Cell::new(0));
//!
//! let seen = hits.clone();
//! doc.observe(doc.body(), EventType::Click, native_callback(move |_| seen.set(seen.get() + 1)), false)
//!     .unwrap();
//!
//! // Clicks on the div bubble up to the body.
//! doc.fire(NativeEvent::mouse(EventType::Click, div, Point::new(20.0, 20.0)));
//! assert_eq!(hits.get(), 1);
//! ```

use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::error::DomError;
use crate::event::{EventType, NativeEvent};
use crate::listener::{ListenerCache, NativeCallback, NativeTarget, Quirks, Subscription};
use crate::node::{Element, NativeRegistration, NodeId, NodeSlot, Position};

#[allow(
    clippy::cast_possible_truncation,
    reason = "node counts never approach u32::MAX"
)]
fn slot_id(idx: usize, generation: u32) -> NodeId {
    NodeId::new(idx as u32, generation)
}

/// Node storage; implements the native half of listener registration.
#[derive(Debug, Default)]
struct NodeTable {
    slots: Vec<NodeSlot>,
    free_list: Vec<usize>,
}

impl NodeTable {
    fn get(&self, id: NodeId) -> Option<&NodeSlot> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.alive && slot.generation == id.generation())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeSlot> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.alive && slot.generation == id.generation())
    }

    fn check(&self, id: NodeId) -> Result<&NodeSlot, DomError> {
        match self.slots.get(id.idx()) {
            None => Err(DomError::UnknownNode(id)),
            Some(slot) if slot.alive && slot.generation == id.generation() => Ok(slot),
            Some(_) => Err(DomError::RemovedNode(id)),
        }
    }

    fn insert(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let slot = NodeSlot {
            alive: true,
            parent,
            element,
            ..NodeSlot::default()
        };
        if let Some(idx) = self.free_list.pop() {
            let generation = self.slots[idx].generation + 1;
            self.slots[idx] = NodeSlot { generation, ..slot };
            slot_id(idx, generation)
        } else {
            self.slots.push(NodeSlot {
                generation: 1,
                ..slot
            });
            slot_id(self.slots.len() - 1, 1)
        }
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|slot| slot.parent)
    }
}

impl NativeTarget for NodeTable {
    fn add_native(&mut self, node: NodeId, kind: EventType, callback: &NativeCallback, capture: bool) {
        if let Some(slot) = self.get_mut(node) {
            slot.native.push(NativeRegistration {
                kind,
                callback: callback.clone(),
                capture,
            });
        }
    }

    fn remove_native(
        &mut self,
        node: NodeId,
        kind: EventType,
        callback: &NativeCallback,
        capture: bool,
    ) -> bool {
        let Some(slot) = self.get_mut(node) else {
            return false;
        };
        let Some(pos) = slot.native.iter().position(|r| {
            r.kind == kind && r.capture == capture && std::rc::Rc::ptr_eq(&r.callback, callback)
        }) else {
            return false;
        };
        slot.native.remove(pos);
        true
    }
}

/// An in-memory document: nodes, geometry, native listeners.
pub struct Document {
    nodes: RefCell<NodeTable>,
    listeners: RefCell<ListenerCache>,
    window: NodeId,
    document: NodeId,
    body: NodeId,
    client_offset: Cell<Vec2>,
    text_selection: Cell<bool>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.borrow().slots.len())
            .field("listeners", &self.listeners.borrow())
            .field("window", &self.window)
            .field("document", &self.document)
            .field("body", &self.body)
            .field("client_offset", &self.client_offset.get())
            .field("text_selection", &self.text_selection.get())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document with default engine quirks.
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    /// A document whose listener cache applies `quirks`.
    pub fn with_quirks(quirks: Quirks) -> Self {
        let mut nodes = NodeTable::default();
        let window = nodes.insert(None, Element::default());
        let document = nodes.insert(None, Element::default());
        let body = nodes.insert(Some(document), Element::default());
        if let Some(root) = nodes.get_mut(document) {
            root.children.push(body);
        }
        Self {
            nodes: RefCell::new(nodes),
            listeners: RefCell::new(ListenerCache::new(quirks)),
            window,
            document,
            body,
            client_offset: Cell::new(Vec2::ZERO),
            text_selection: Cell::new(true),
        }
    }

    /// The window node.
    pub fn window(&self) -> NodeId {
        self.window
    }

    /// The document (root) node.
    pub fn document_node(&self) -> NodeId {
        self.document
    }

    /// The body node.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// The engine quirks in effect.
    pub fn quirks(&self) -> Quirks {
        self.listeners.borrow().quirks()
    }

    // --- tree ---------------------------------------------------------------

    /// Append a new element under `parent`.
    pub fn append(&self, parent: NodeId, element: Element) -> Result<NodeId, DomError> {
        if parent == self.window {
            return Err(DomError::Unsupported {
                node: parent,
                reason: "cannot have children",
            });
        }
        let mut nodes = self.nodes.borrow_mut();
        nodes.check(parent)?;
        let id = nodes.insert(Some(parent), element);
        if let Some(slot) = nodes.get_mut(parent) {
            slot.children.push(id);
        }
        Ok(id)
    }

    /// Remove `node` and its subtree, tearing down every listener recorded for them.
    pub fn remove_node(&self, node: NodeId) -> Result<(), DomError> {
        if node == self.window || node == self.document || node == self.body {
            return Err(DomError::Unsupported {
                node,
                reason: "is a permanent node",
            });
        }
        let mut doomed = Vec::new();
        {
            let nodes = self.nodes.borrow();
            nodes.check(node)?;
            let mut stack = vec![node];
            while let Some(n) = stack.pop() {
                doomed.push(n);
                if let Some(slot) = nodes.get(n) {
                    stack.extend(slot.children.iter().copied());
                }
            }
        }
        {
            let mut nodes = self.nodes.borrow_mut();
            let mut cache = self.listeners.borrow_mut();
            for &n in &doomed {
                cache.forget(&mut *nodes, n);
            }
            if let Some(parent) = nodes.parent(node)
                && let Some(slot) = nodes.get_mut(parent)
            {
                slot.children.retain(|c| *c != node);
            }
            for &n in &doomed {
                if let Some(slot) = nodes.get_mut(n) {
                    slot.alive = false;
                    slot.children.clear();
                    slot.native.clear();
                    nodes.free_list.push(n.idx());
                }
            }
        }
        tracing::debug!(?node, removed = doomed.len(), "removed subtree");
        Ok(())
    }

    /// Whether `node` refers to a live node.
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.nodes.borrow().get(node).is_some()
    }

    /// Fail with an invalid-argument error unless `node` is live.
    pub fn check(&self, node: NodeId) -> Result<(), DomError> {
        self.nodes.borrow().check(node).map(|_| ())
    }

    /// Parent of `node`.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().parent(node)
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = nodes.parent(n);
        }
        false
    }

    /// A copy of `node`'s element description.
    pub fn element(&self, node: NodeId) -> Option<Element> {
        self.nodes.borrow().get(node).map(|slot| slot.element.clone())
    }

    /// Mutate `node`'s element description in place.
    pub fn update<R>(&self, node: NodeId, f: impl FnOnce(&mut Element) -> R) -> Result<R, DomError> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.check(node)?;
        let slot = nodes.get_mut(node).ok_or(DomError::RemovedNode(node))?;
        Ok(f(&mut slot.element))
    }

    // --- geometry -----------------------------------------------------------

    /// Viewport scroll offsets (the document node's scroll).
    pub fn viewport_scroll(&self) -> Vec2 {
        self.nodes
            .borrow()
            .get(self.document)
            .map_or(Vec2::ZERO, |slot| slot.element.scroll)
    }

    /// Scroll the viewport.
    ///
    /// This only moves the geometry; listeners hear about it when the host
    /// fires a `scroll` event at the [`window`](Self::window).
    pub fn set_viewport_scroll(&self, scroll: Vec2) {
        if let Some(slot) = self.nodes.borrow_mut().get_mut(self.document) {
            slot.element.scroll = scroll;
        }
    }

    /// Root element client offsets (`clientLeft`/`clientTop`).
    pub fn client_offset(&self) -> Vec2 {
        self.client_offset.get()
    }

    /// Set the root element client offsets.
    pub fn set_client_offset(&self, offset: Vec2) {
        self.client_offset.set(offset);
    }

    /// CSS `position` of `node`.
    pub fn style_position(&self, node: NodeId) -> Position {
        self.nodes
            .borrow()
            .get(node)
            .map_or(Position::Static, |slot| slot.element.position)
    }

    /// The offset parent of `node`.
    ///
    /// An explicit [`Element::offset_parent`] wins; otherwise the nearest
    /// positioned ancestor, falling back to the body. The body, the document
    /// node, the window and detached subtrees have none.
    pub fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        if node == self.body || node == self.document || node == self.window {
            return None;
        }
        let nodes = self.nodes.borrow();
        let slot = nodes.get(node)?;
        if let Some(explicit) = slot.element.offset_parent {
            return nodes.get(explicit).map(|_| explicit);
        }
        let mut cur = slot.parent;
        while let Some(p) = cur {
            if p == self.document {
                return None;
            }
            let parent = nodes.get(p)?;
            if p == self.body || parent.element.position.is_positioned() {
                return Some(p);
            }
            cur = parent.parent;
        }
        None
    }

    /// Page position of `node`: the sum of offsets along the offset-parent
    /// chain, minus the scroll of every ancestor (the viewport scroll included).
    ///
    /// Nodes without an offset parent report the origin.
    pub fn page_position(&self, node: NodeId) -> Point {
        if self.offset_parent(node).is_none() {
            return Point::ORIGIN;
        }
        let mut pos = Vec2::ZERO;
        let mut o = Some(node);
        while let Some(n) = o {
            pos += self
                .nodes
                .borrow()
                .get(n)
                .map_or(Vec2::ZERO, |slot| slot.element.offset);
            o = self.offset_parent(n);
        }
        let nodes = self.nodes.borrow();
        let mut e = Some(node);
        while let Some(n) = e {
            let Some(slot) = nodes.get(n) else { break };
            pos -= slot.element.scroll;
            e = slot.parent;
        }
        pos.to_point()
    }

    /// Whether a `mouseout` event left `node` entirely (the pointer did not
    /// move into `node` or one of its descendants).
    pub fn mouse_left(&self, event: &NativeEvent, node: NodeId) -> bool {
        match event.related_target {
            Some(to) => !self.contains(node, to),
            None => true,
        }
    }

    /// Whether `node` has class `name`.
    pub fn has_class(&self, node: NodeId, name: &str) -> bool {
        self.nodes
            .borrow()
            .get(node)
            .is_some_and(|slot| slot.element.has_class(name))
    }

    /// Add class `name` to `node`; no-op if present or the node is gone.
    pub fn add_class(&self, node: NodeId, name: &str) {
        if let Some(slot) = self.nodes.borrow_mut().get_mut(node)
            && !slot.element.has_class(name)
        {
            slot.element.classes.push(name.to_owned());
        }
    }

    /// Remove class `name` from `node`; no-op if absent or the node is gone.
    pub fn remove_class(&self, node: NodeId, name: &str) {
        if let Some(slot) = self.nodes.borrow_mut().get_mut(node) {
            slot.element.classes.retain(|c| c != name);
        }
    }

    // --- text selection -------------------------------------------------------

    /// Whether native text selection is currently allowed (`onselectstart`).
    pub fn text_selection(&self) -> bool {
        self.text_selection.get()
    }

    /// Allow or suppress native text selection.
    pub fn set_text_selection(&self, enabled: bool) {
        self.text_selection.set(enabled);
    }

    // --- listeners ------------------------------------------------------------

    /// Observe `kind` on `node` through the listener cache.
    pub fn observe(
        &self,
        node: NodeId,
        kind: EventType,
        callback: NativeCallback,
        capture: bool,
    ) -> Result<Subscription, DomError> {
        let mut nodes = self.nodes.borrow_mut();
        let dom_id = nodes.check(node)?.element.dom_id.clone();
        let mut cache = self.listeners.borrow_mut();
        Ok(cache.attach(&mut *nodes, node, dom_id.as_deref(), kind, callback, capture))
    }

    /// Stop observing one `(node, kind, callback, capture)` tuple.
    pub fn stop_observing(
        &self,
        node: NodeId,
        kind: EventType,
        callback: &NativeCallback,
        capture: bool,
    ) -> bool {
        let mut nodes = self.nodes.borrow_mut();
        self.listeners
            .borrow_mut()
            .detach(&mut *nodes, node, kind, callback, capture)
    }

    /// Stop observing everything recorded for `node`.
    pub fn stop_observing_node(&self, node: NodeId) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        self.listeners.borrow_mut().detach_all(&mut *nodes, node)
    }

    /// Tear down every subscription in the document.
    pub fn unload(&self) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        self.listeners.borrow_mut().unload(&mut *nodes)
    }

    /// Number of subscriptions recorded for `node`.
    pub fn subscription_count(&self, node: NodeId) -> usize {
        self.listeners.borrow().subscription_count(node)
    }

    /// Whether `kind` is observed on `node`.
    pub fn is_observed(&self, node: NodeId, kind: EventType) -> bool {
        self.listeners.borrow().is_observed(node, kind)
    }

    /// Number of native registrations installed on `node`.
    pub fn native_listener_count(&self, node: NodeId) -> usize {
        self.nodes
            .borrow()
            .get(node)
            .map_or(0, |slot| slot.native.len())
    }

    // --- delivery ---------------------------------------------------------------

    fn propagation_path(&self, target: NodeId) -> SmallVec<[NodeId; 8]> {
        let nodes = self.nodes.borrow();
        let mut path = SmallVec::new();
        let mut cur = nodes.get(target).map(|_| target);
        while let Some(n) = cur {
            path.push(n);
            cur = nodes.parent(n);
        }
        path
    }

    fn callbacks_for(&self, node: NodeId, kind: EventType, capture: bool) -> SmallVec<[NativeCallback; 4]> {
        self.nodes.borrow().get(node).map_or_else(SmallVec::new, |slot| {
            slot.native
                .iter()
                .filter(|r| r.kind == kind && r.capture == capture)
                .map(|r| r.callback.clone())
                .collect()
        })
    }

    fn run_node(&self, node: NodeId, capture: bool, event: &mut NativeEvent) {
        let callbacks = self.callbacks_for(node, event.kind, capture);
        if callbacks.is_empty() {
            return;
        }
        event.set_current_target(Some(node));
        for cb in &callbacks {
            cb(event);
        }
    }

    /// Deliver a native event and return it with its cancellation flags set.
    ///
    /// Events targeting a node that is not live are returned untouched.
    pub fn fire(&self, mut event: NativeEvent) -> NativeEvent {
        let path = self.propagation_path(event.target);
        if path.is_empty() {
            tracing::trace!(target_node = ?event.target, kind = %event.kind, "dropped event for dead node");
            return event;
        }
        tracing::trace!(target_node = ?event.target, kind = %event.kind, "fire");

        // Capture: root → target.
        for &node in path.iter().rev() {
            self.run_node(node, true, &mut event);
            if event.propagation_stopped() {
                event.set_current_target(None);
                return event;
            }
        }
        // Target, then bubble: target → root.
        for (depth, &node) in path.iter().enumerate() {
            if depth > 0 && !event.kind.bubbles() {
                break;
            }
            self.run_node(node, false, &mut event);
            if event.propagation_stopped() {
                break;
            }
        }
        event.set_current_target(None);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::native_callback;
    use kurbo::Size;
    use std::rc::Rc;

    fn log_cb(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> NativeCallback {
        let log = log.clone();
        native_callback(move |_| log.borrow_mut().push(name))
    }

    #[test]
    fn append_and_remove_manage_generations() {
        let doc = Document::new();
        let a = doc.append(doc.body(), Element::default()).unwrap();
        doc.remove_node(a).unwrap();
        assert!(!doc.is_alive(a));
        assert_eq!(doc.check(a), Err(DomError::RemovedNode(a)));

        let b = doc.append(doc.body(), Element::default()).unwrap();
        assert_eq!(a.idx(), b.idx());
        assert_ne!(a, b);
        assert!(doc.is_alive(b));
    }

    #[test]
    fn permanent_nodes_cannot_be_removed() {
        let doc = Document::new();
        assert!(doc.remove_node(doc.body()).is_err());
        assert!(doc.append(doc.window(), Element::default()).is_err());
    }

    #[test]
    fn observe_rejects_dead_nodes() {
        let doc = Document::new();
        let a = doc.append(doc.body(), Element::default()).unwrap();
        doc.remove_node(a).unwrap();
        let err = doc
            .observe(a, EventType::Click, native_callback(|_| {}), false)
            .unwrap_err();
        assert_eq!(err.node(), a);
    }

    #[test]
    fn page_position_sums_offsets_and_subtracts_scroll() {
        let doc = Document::new();
        let outer = doc
            .append(
                doc.body(),
                Element::at(Vec2::new(100.0, 50.0), Size::new(400.0, 400.0))
                    .with_position(Position::Relative)
                    .with_scroll(Vec2::new(0.0, 20.0)),
            )
            .unwrap();
        let inner = doc
            .append(outer, Element::at(Vec2::new(10.0, 30.0), Size::new(40.0, 40.0)))
            .unwrap();
        assert_eq!(doc.offset_parent(inner), Some(outer));
        assert_eq!(doc.page_position(inner), Point::new(110.0, 60.0));

        doc.set_viewport_scroll(Vec2::new(5.0, 5.0));
        assert_eq!(doc.page_position(inner), Point::new(105.0, 55.0));
        assert_eq!(doc.page_position(doc.body()), Point::ORIGIN);
    }

    #[test]
    fn static_parents_are_skipped_for_offset_parent() {
        let doc = Document::new();
        let wrapper = doc.append(doc.body(), Element::default()).unwrap();
        let child = doc.append(wrapper, Element::default()).unwrap();
        assert_eq!(doc.offset_parent(child), Some(doc.body()));
    }

    #[test]
    fn capture_runs_before_bubble_and_stop_halts_path() {
        let doc = Document::new();
        let div = doc.append(doc.body(), Element::default()).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));

        doc.observe(doc.body(), EventType::MouseDown, log_cb(&log, "body-capture"), true)
            .unwrap();
        doc.observe(div, EventType::MouseDown, log_cb(&log, "div"), false)
            .unwrap();
        doc.observe(doc.body(), EventType::MouseDown, log_cb(&log, "body-bubble"), false)
            .unwrap();
        doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::ZERO));
        assert_eq!(*log.borrow(), vec!["body-capture", "div", "body-bubble"]);

        log.borrow_mut().clear();
        let stopper = native_callback(|ev| ev.stop(true));
        doc.observe(div, EventType::MouseDown, stopper, false).unwrap();
        let ev = doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::ZERO));
        assert!(ev.propagation_stopped());
        assert_eq!(*log.borrow(), vec!["body-capture", "div"]);
    }

    #[test]
    fn focus_does_not_bubble() {
        let doc = Document::new();
        let div = doc.append(doc.body(), Element::default()).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        doc.observe(doc.body(), EventType::Focus, log_cb(&log, "body"), false)
            .unwrap();
        doc.observe(div, EventType::Focus, log_cb(&log, "div"), false)
            .unwrap();
        doc.fire(NativeEvent::new(EventType::Focus, div));
        assert_eq!(*log.borrow(), vec!["div"]);
    }

    #[test]
    fn removing_a_node_detaches_its_subtree() {
        let doc = Document::new();
        let div = doc.append(doc.body(), Element::default()).unwrap();
        let child = doc.append(div, Element::default()).unwrap();
        doc.observe(div, EventType::Click, native_callback(|_| {}), false)
            .unwrap();
        doc.observe(child, EventType::Click, native_callback(|_| {}), false)
            .unwrap();

        doc.remove_node(div).unwrap();
        assert_eq!(doc.subscription_count(div), 0);
        assert_eq!(doc.subscription_count(child), 0);
        assert!(!doc.is_alive(child));
    }

    #[test]
    fn listeners_added_during_delivery_wait_for_next_event() {
        let doc = Rc::new(Document::new());
        let div = doc.append(doc.body(), Element::default()).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));

        let late = log_cb(&log, "late");
        let weak = Rc::downgrade(&doc);
        let adder = native_callback(move |ev| {
            if let Some(doc) = weak.upgrade() {
                let _ = doc.observe(ev.target, EventType::Click, late.clone(), false);
            }
        });
        doc.observe(div, EventType::Click, adder, false).unwrap();

        doc.fire(NativeEvent::mouse(EventType::Click, div, Point::ZERO));
        assert!(log.borrow().is_empty());
        doc.fire(NativeEvent::mouse(EventType::Click, div, Point::ZERO));
        assert_eq!(*log.borrow(), vec!["late"]);
    }

    #[test]
    fn mouse_left_walks_related_target_ancestry() {
        let doc = Document::new();
        let div = doc.append(doc.body(), Element::default()).unwrap();
        let child = doc.append(div, Element::default()).unwrap();

        let into_child = NativeEvent::new(EventType::MouseOut, div).with_related_target(child);
        assert!(!doc.mouse_left(&into_child, div));
        let to_body = NativeEvent::new(EventType::MouseOut, div).with_related_target(doc.body());
        assert!(doc.mouse_left(&to_body, div));
        let off_page = NativeEvent::new(EventType::MouseOut, div);
        assert!(doc.mouse_left(&off_page, div));
    }

    #[test]
    fn classes_are_deduplicated() {
        let doc = Document::new();
        let div = doc.append(doc.body(), Element::default()).unwrap();
        doc.add_class(div, "pressed");
        doc.add_class(div, "pressed");
        assert_eq!(doc.element(div).unwrap().classes.len(), 1);
        doc.remove_class(div, "pressed");
        assert!(!doc.has_class(div, "pressed"));
    }
}

// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-object event router.
//!
//! An [`EventRouter`] belongs to one application object (identified by a
//! [`ContextId`]) and optionally to one document node. Once attached, every
//! browser event in [`BROWSER_EVENTS`] that reaches the node is translated
//! into a dispatch on the channel of the same name; applications add their
//! own channels with [`EventRouter::add_channel`] and fire them with
//! [`EventRouter::dispatch`].
//!
//! ## Ordering
//!
//! Listeners run head to tail. [`register_priority`](EventRouter::register_priority)
//! inserts at the head, so gesture handlers see an event before anything
//! registered with [`register`](EventRouter::register). A listener returning
//! `Some(false)` ends the chain.
//!
//! ## Re-entrancy
//!
//! Dispatch iterates a snapshot of the channel and holds no borrow while a
//! listener runs: listeners may register, unregister, dispatch or destroy the
//! router itself.
//!
//! ```
//! use std::rc::Rc;
//! use kurbo::{Point, Size, Vec2};
//! use branch_dom::{Document, Element, EventType, NativeEvent};
//! use branch_events::{ContextId, EventRouter, RouterOptions, listener};
//!
//! let doc = Rc::new(Document::new());
//! let div = doc
//!     .append(doc.body(), Element::at(Vec2::new(10.0, 10.0), Size::new(80.0, 80.0)))
//!     .unwrap();
//! let router = EventRouter::attached(
//!     doc.clone(),
//!     ContextId::next(),
//!     div,
//!     &[],
//!     RouterOptions::default().with_include_xy(true),
//! )
//! .unwrap();
//!
//! let seen = Rc::new(std::cell::Cell::new(None));
//! let sink = seen.clone();
//! router.register("mousedown", None, listener(move |_, ev| {
//!     sink.set(ev.xy);
//!     None
//! }));
//!
//! let ev = doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::new(15.0, 20.0)));
//! assert_eq!(seen.get(), Some(Point::new(5.0, 10.0)));
//! // Without fall-through the native event stops at the router.
//! assert!(ev.default_prevented() && ev.propagation_stopped());
//! ```

use core::cell::{Cell, OnceCell, RefCell};
use core::fmt;
use std::rc::{Rc, Weak};

use branch_dom::{Document, DomError, EventType, NativeCallback, NativeEvent, NodeId, native_callback};
use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;

use crate::channel::{Channel, Listener, ListenerFn, listener};
use crate::context::ContextId;
use crate::event::Event;
use crate::offset::MouseOffsetCache;

/// Native event types every attached router translates into channels.
pub const BROWSER_EVENTS: [EventType; 12] = [
    EventType::MouseOver,
    EventType::MouseOut,
    EventType::MouseDown,
    EventType::MouseUp,
    EventType::MouseMove,
    EventType::Click,
    EventType::DblClick,
    EventType::RightClick,
    EventType::DblRightClick,
    EventType::Resize,
    EventType::Focus,
    EventType::Blur,
];

type WeakListener = Weak<dyn Fn(ContextId, &mut Event<'_>) -> Option<bool>>;

/// Router configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouterOptions {
    /// Let native events continue past the node after dispatch.
    ///
    /// When `false`, every non-empty dispatch of a translated event prevents
    /// the native default action and stops propagation.
    pub fall_through: bool,
    /// Compute `xy` for translated events and keep the offset cache between
    /// events.
    ///
    /// With `include_xy` set the cache is only invalidated by viewport scroll
    /// and [`EventRouter::clear_mouse_cache`]; callers must clear it when the
    /// node moves.
    pub include_xy: bool,
}

impl RouterOptions {
    /// Sets [`fall_through`](Self::fall_through).
    #[must_use]
    pub const fn with_fall_through(mut self, fall_through: bool) -> Self {
        self.fall_through = fall_through;
        self
    }

    /// Sets [`include_xy`](Self::include_xy).
    #[must_use]
    pub const fn with_include_xy(mut self, include_xy: bool) -> Self {
        self.include_xy = include_xy;
        self
    }
}

/// What [`EventRouter::register`] hands back: enough to unregister later.
#[derive(Clone)]
pub struct ListenerHandle {
    /// Channel the listener was added to.
    pub channel: String,
    /// Context it was bound to.
    pub context: ContextId,
    /// The callback.
    pub callback: ListenerFn,
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("channel", &self.channel)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Named channels of application listeners, optionally fed by a document node.
pub struct EventRouter {
    weak_self: Weak<Self>,
    doc: Rc<Document>,
    object: ContextId,
    options: RouterOptions,
    element: Cell<Option<NodeId>>,
    channels: RefCell<HashMap<String, Channel>>,
    event_types: RefCell<Vec<String>>,
    offsets: RefCell<MouseOffsetCache>,
    native_handler: NativeCallback,
    clear_mouse_listener: NativeCallback,
    drag_stopper: NativeCallback,
    observed: RefCell<SmallVec<[EventType; 12]>>,
    stops_drag: Cell<bool>,
    has_scroll_listener: Cell<bool>,
}

impl fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRouter")
            .field("object", &self.object)
            .field("options", &self.options)
            .field("element", &self.element.get())
            .field("event_types", &self.event_types.borrow())
            .field("observed", &self.observed.borrow())
            .field("offsets", &self.offsets.borrow())
            .field("has_scroll_listener", &self.has_scroll_listener.get())
            .finish_non_exhaustive()
    }
}

impl EventRouter {
    /// A detached router owned by `object` with the given custom channels.
    pub fn new(
        doc: Rc<Document>,
        object: ContextId,
        channels: &[&str],
        options: RouterOptions,
    ) -> Rc<Self> {
        let router = Rc::new_cyclic(|weak: &Weak<Self>| {
            let on_native = weak.clone();
            let on_scroll = weak.clone();
            Self {
                weak_self: weak.clone(),
                doc,
                object,
                options,
                element: Cell::new(None),
                channels: RefCell::new(HashMap::new()),
                event_types: RefCell::new(Vec::new()),
                offsets: RefCell::new(MouseOffsetCache::default()),
                native_handler: native_callback(move |ev| {
                    if let Some(router) = on_native.upgrade() {
                        router.handle_native(ev);
                    }
                }),
                clear_mouse_listener: native_callback(move |_| {
                    if let Some(router) = on_scroll.upgrade() {
                        router.clear_mouse_cache();
                    }
                }),
                drag_stopper: native_callback(|ev| ev.stop(false)),
                observed: RefCell::new(SmallVec::new()),
                stops_drag: Cell::new(false),
                has_scroll_listener: Cell::new(false),
            }
        });
        for name in channels {
            router.add_channel(name);
        }
        router
    }

    /// A router attached to `node` from the start.
    pub fn attached(
        doc: Rc<Document>,
        object: ContextId,
        node: NodeId,
        channels: &[&str],
        options: RouterOptions,
    ) -> Result<Rc<Self>, DomError> {
        let router = Self::new(doc, object, channels, options);
        router.attach_to_node(node)?;
        Ok(router)
    }

    /// The document this router observes.
    pub fn document(&self) -> &Rc<Document> {
        &self.doc
    }

    /// The owner context; the default context for listeners.
    pub fn object(&self) -> ContextId {
        self.object
    }

    /// The attached node, if any.
    pub fn element(&self) -> Option<NodeId> {
        self.element.get()
    }

    /// Configuration.
    pub fn options(&self) -> RouterOptions {
        self.options
    }

    // --- channels -------------------------------------------------------------

    /// Add a channel; no-op if it exists.
    pub fn add_channel(&self, name: &str) {
        let mut channels = self.channels.borrow_mut();
        if !channels.contains_key(name) {
            channels.insert(name.to_owned(), Channel::default());
            self.event_types.borrow_mut().push(name.to_owned());
        }
    }

    /// Whether the channel exists.
    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.borrow().contains_key(name)
    }

    /// Channel names in creation order.
    pub fn channel_names(&self) -> Vec<String> {
        self.event_types.borrow().clone()
    }

    /// Number of listeners on a channel (0 when it does not exist).
    pub fn listener_count(&self, name: &str) -> usize {
        self.channels.borrow().get(name).map_or(0, Channel::len)
    }

    /// Contexts of a channel's listeners, head first.
    pub fn listener_contexts(&self, name: &str) -> Vec<ContextId> {
        self.channels.borrow().get(name).map_or_else(Vec::new, |ch| {
            ch.listeners().iter().map(|l| l.context).collect()
        })
    }

    /// Empty a channel without deleting it.
    pub fn remove_channel(&self, name: &str) {
        if let Some(ch) = self.channels.borrow_mut().get_mut(name) {
            ch.clear();
        }
    }

    // --- attachment ---------------------------------------------------------------

    /// Feed browser events on `node` into this router.
    ///
    /// Subscriptions this router made on a previously attached node are
    /// dropped first. Native `dragstart` is suppressed on the node.
    pub fn attach_to_node(&self, node: NodeId) -> Result<(), DomError> {
        self.attach(node, &BROWSER_EVENTS, true)
    }

    /// Feed only `kinds` on `node` into this router.
    ///
    /// Like [`attach_to_node`](Self::attach_to_node), but without the rest of
    /// the browser set and without `dragstart` suppression.
    pub fn attach_to_node_with(&self, node: NodeId, kinds: &[EventType]) -> Result<(), DomError> {
        self.attach(node, kinds, false)
    }

    fn attach(&self, node: NodeId, kinds: &[EventType], stop_drag: bool) -> Result<(), DomError> {
        self.doc.check(node)?;
        if let Some(previous) = self.element.get() {
            self.detach_native(previous);
        }
        self.element.set(Some(node));
        self.offsets.borrow_mut().clear();
        for &kind in kinds {
            self.add_channel(kind.as_str());
            self.doc
                .observe(node, kind, self.native_handler.clone(), false)?;
            self.observed.borrow_mut().push(kind);
        }
        if stop_drag {
            self.doc
                .observe(node, EventType::DragStart, self.drag_stopper.clone(), false)?;
            self.stops_drag.set(true);
        }
        tracing::debug!(object = self.object.raw(), ?node, kinds = kinds.len(), "router attached");
        Ok(())
    }

    fn detach_native(&self, node: NodeId) {
        let observed = core::mem::take(&mut *self.observed.borrow_mut());
        for kind in observed {
            self.doc
                .stop_observing(node, kind, &self.native_handler, false);
        }
        if self.stops_drag.replace(false) {
            self.doc
                .stop_observing(node, EventType::DragStart, &self.drag_stopper, false);
        }
    }

    // --- listeners ------------------------------------------------------------------

    fn insert(
        &self,
        channel: &str,
        context: Option<ContextId>,
        callback: ListenerFn,
        priority: bool,
    ) -> Option<ListenerHandle> {
        let mut channels = self.channels.borrow_mut();
        let ch = channels.get_mut(channel)?;
        let context = context.unwrap_or(self.object);
        let record = Listener::new(context, callback.clone());
        if priority {
            ch.push_front(record);
        } else {
            ch.push(record);
        }
        Some(ListenerHandle {
            channel: channel.to_owned(),
            context,
            callback,
        })
    }

    /// Append a listener to an existing channel.
    ///
    /// `context` defaults to the owner. Unknown channels are ignored and
    /// yield `None`.
    pub fn register(
        &self,
        channel: &str,
        context: Option<ContextId>,
        callback: ListenerFn,
    ) -> Option<ListenerHandle> {
        self.insert(channel, context, callback, false)
    }

    /// Like [`register`](Self::register), but ahead of every existing listener.
    pub fn register_priority(
        &self,
        channel: &str,
        context: Option<ContextId>,
        callback: ListenerFn,
    ) -> Option<ListenerHandle> {
        self.insert(channel, context, callback, true)
    }

    /// Remove the first listener bound to `context` (default: the owner) and,
    /// when given, `callback`.
    pub fn unregister(
        &self,
        channel: &str,
        context: Option<ContextId>,
        callback: Option<&ListenerFn>,
    ) -> bool {
        let context = context.unwrap_or(self.object);
        self.channels
            .borrow_mut()
            .get_mut(channel)
            .is_some_and(|ch| ch.remove_first(context, callback))
    }

    /// Remove the listener a [`register`](Self::register) call returned.
    pub fn unregister_handle(&self, handle: &ListenerHandle) -> bool {
        self.unregister(&handle.channel, Some(handle.context), Some(&handle.callback))
    }

    /// Remove every listener bound to `context` (default: the owner).
    pub fn clear(&self, channel: &str, context: Option<ContextId>) -> usize {
        let context = context.unwrap_or(self.object);
        self.channels
            .borrow_mut()
            .get_mut(channel)
            .map_or(0, |ch| ch.remove_context(context))
    }

    /// Register a table of listeners under one context; returns how many
    /// channels accepted theirs.
    pub fn on(&self, context: Option<ContextId>, table: &[(&str, ListenerFn)]) -> usize {
        table
            .iter()
            .filter(|(channel, cb)| self.register(channel, context, cb.clone()).is_some())
            .count()
    }

    /// [`on`](Self::on) with priority registration.
    pub fn on_priority(&self, context: Option<ContextId>, table: &[(&str, ListenerFn)]) -> usize {
        table
            .iter()
            .filter(|(channel, cb)| {
                self.register_priority(channel, context, cb.clone())
                    .is_some()
            })
            .count()
    }

    /// Unregister a table of listeners; returns how many were found.
    pub fn un(&self, context: Option<ContextId>, table: &[(&str, ListenerFn)]) -> usize {
        table
            .iter()
            .filter(|(channel, cb)| self.unregister(channel, context, Some(cb)))
            .count()
    }

    /// Swallow the next event on `channel`.
    ///
    /// Installs a one-shot priority listener that stops propagation of the
    /// native event, ends the chain and removes itself.
    pub fn break_event(&self, channel: &str) -> bool {
        let slot: Rc<OnceCell<WeakListener>> = Rc::default();
        let me = slot.clone();
        let router = self.weak_self.clone();
        let name = channel.to_owned();
        let cb = listener(move |ctx, ev| {
            if let Some(router) = router.upgrade()
                && let Some(this) = me.get().and_then(Weak::upgrade)
            {
                router.unregister(&name, Some(ctx), Some(&this));
            }
            ev.stop(true);
            Some(false)
        });
        let _ = slot.set(Rc::downgrade(&cb));
        self.register_priority(channel, None, cb).is_some()
    }

    // --- dispatch -----------------------------------------------------------------

    /// Run a channel's listeners.
    ///
    /// Stamps `object`, `element` and (if unset) `kind` on the payload, then
    /// runs a snapshot of the listeners until one returns `Some(false)`.
    /// Returns the last listener's return value, or `None` for an empty or
    /// unknown channel.
    pub fn dispatch(&self, channel: &str, event: &mut Event<'_>) -> Option<bool> {
        let snapshot = {
            let channels = self.channels.borrow();
            match channels.get(channel) {
                Some(ch) if !ch.is_empty() => ch.snapshot(),
                _ => return None,
            }
        };
        event.object = Some(self.object);
        event.element = self.element.get();
        if event.kind.is_none() {
            event.kind = Some(channel.to_owned());
        }
        tracing::trace!(object = self.object.raw(), channel, listeners = snapshot.len(), "dispatch");

        let mut result = None;
        for entry in &snapshot {
            result = (entry.callback)(entry.context, event);
            if result == Some(false) {
                break;
            }
        }
        if !self.options.fall_through {
            event.stop(false);
        }
        result
    }

    /// Dispatch an empty payload.
    pub fn trigger(&self, channel: &str) -> Option<bool> {
        self.dispatch(channel, &mut Event::new())
    }

    /// Translate a native event on the attached node into a dispatch.
    ///
    /// Ignored once the router has no node.
    pub fn handle_native(&self, native: &mut NativeEvent) {
        if self.element.get().is_none() {
            return;
        }
        let xy = self
            .options
            .include_xy
            .then(|| self.pointer_position(native));
        let kind = native.kind;
        let mut event = Event::from_native(native);
        event.xy = xy;
        self.dispatch(kind.as_str(), &mut event);
    }

    // --- pointer position ---------------------------------------------------------------

    /// Pointer position of `native` relative to the attached node.
    ///
    /// Without `include_xy` the offset cache is resampled on every call;
    /// with it, the first call installs a viewport-scroll listener that
    /// invalidates the cache. A detached router reports the client position.
    pub fn pointer_position(&self, native: &NativeEvent) -> Point {
        let Some(node) = self.element.get() else {
            return native.client;
        };
        if !self.options.include_xy {
            self.clear_mouse_cache();
        } else if !self.has_scroll_listener.get() {
            match self.doc.observe(
                self.doc.window(),
                EventType::Scroll,
                self.clear_mouse_listener.clone(),
                false,
            ) {
                Ok(_) => self.has_scroll_listener.set(true),
                Err(err) => tracing::warn!(%err, "could not observe viewport scroll"),
            }
        }
        self.offsets
            .borrow_mut()
            .pointer_position(&self.doc, node, native.client)
    }

    /// Drop cached offsets. Call whenever the attached node may have moved.
    pub fn clear_mouse_cache(&self) {
        self.offsets.borrow_mut().clear();
    }

    /// The current offset cache.
    pub fn mouse_cache(&self) -> MouseOffsetCache {
        *self.offsets.borrow()
    }

    // --- teardown -----------------------------------------------------------------

    /// Detach from the node and the viewport and drop every channel.
    ///
    /// Later registrations find no channel and are ignored. Dropping the
    /// last reference to a router does the same.
    pub fn destroy(&self) {
        if let Some(node) = self.element.take() {
            self.detach_native(node);
            tracing::debug!(object = self.object.raw(), ?node, "router destroyed");
        }
        if self.has_scroll_listener.replace(false) {
            self.doc.stop_observing(
                self.doc.window(),
                EventType::Scroll,
                &self.clear_mouse_listener,
                false,
            );
        }
        self.offsets.borrow_mut().clear();
        self.channels.borrow_mut().clear();
        self.event_types.borrow_mut().clear();
    }
}

impl Drop for EventRouter {
    fn drop(&mut self) {
        self.destroy();
    }
}

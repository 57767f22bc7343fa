// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag recognizer: turns `mousedown → mousemove* → (mouseup | mouseout)`
//! on a control's node into `down`, `move`, `up`/`out` and `done` callbacks.
//!
//! ## States
//!
//! - **Idle**: nothing pressed.
//! - **Armed**: a qualifying primary-button `mousedown` was seen
//!   ([`DragRecognizer::is_started`]).
//! - **Dragging**: at least one `mousemove` was processed since the down
//!   ([`DragRecognizer::is_dragging`]).
//!
//! `mouseup` (or, in [`CoordinateMode::Anchored`], leaving the node) returns
//! to Idle and fires `up`/`out`, followed by `done` only if the pointer moved.
//! A press and release with no move in between never produces `done`.
//!
//! ## Coordinates
//!
//! Every callback receives `xy`, the pointer position relative to the
//! control's node. `move` also receives a page position:
//!
//! - [`CoordinateMode::Anchored`]: the client position minus the page position
//!   of the node's parent, sampled once at `mousedown`.
//! - [`CoordinateMode::Document`]: the client position minus the `xy` recorded
//!   at `mousedown`. Used for absolutely positioned nodes; dragging continues
//!   through a document-level router after the pointer leaves the node.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::{Point, Size, Vec2};
//! use branch_dom::{Document, Element, EventType, NativeEvent};
//! use branch_handler::{Callbacks, ControlBase, DragEvent, DragOptions, DragRecognizer};
//!
//! let doc = Rc::new(Document::new());
//! let div = doc
//!     .append(doc.body(), Element::at(Vec2::ZERO, Size::new(100.0, 100.0)))
//!     .unwrap();
//! let control = Rc::new(ControlBase::new(doc.clone(), div));
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let sink = log.clone();
//! let callbacks = Callbacks::new().on("done", move |_: &ControlBase, ev: &DragEvent| {
//!     sink.borrow_mut().push(ev.xy());
//! });
//! let drag = DragRecognizer::new(control, callbacks, DragOptions::default()).unwrap();
//! drag.activate();
//!
//! doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::new(10.0, 10.0)));
//! doc.fire(NativeEvent::mouse(EventType::MouseMove, div, Point::new(30.0, 25.0)));
//! doc.fire(NativeEvent::mouse(EventType::MouseUp, div, Point::new(30.0, 25.0)));
//! assert_eq!(*log.borrow(), [Point::new(30.0, 25.0)]);
//! ```
//!
//! Hooks ([`DragHooks`]) run while the recognizer is borrowed and must not
//! call back into it; callbacks run afterwards and may. Neither should panic:
//! a panic mid-gesture leaves the recognizer in whatever state it had reached.

use core::cell::RefCell;
use core::fmt;
use std::rc::{Rc, Weak};

use branch_dom::{Document, DomError, EventType, KeyState, NativeEvent, NodeId, Position};
use branch_events::{ContextId, Event, EventRouter, ListenerFn, RouterOptions, listener};
use kurbo::{Point, Vec2};

use crate::control::{Control, ensure_events};
use crate::handler::{
    self, BrowserHandler, CallbackArgs, Callbacks, HandlerBase, HandlerOptions, Response,
    run_handler,
};
use crate::modifiers::KeyMask;

/// Class put on the control's node while a gesture is in progress.
pub const PRESSED_CLASS: &str = "branchDragDown";

/// Class put on the body while a document-mode drag is outside the node.
pub const DOCUMENT_DRAG_CLASS: &str = "branchDragging";

/// How `move` page positions are expressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateMode {
    /// Relative to the page position of the node's parent.
    Anchored,
    /// Relative to the position recorded at `mousedown`.
    Document,
}

/// Drag recognizer configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragOptions {
    /// Minimum milliseconds between processed moves; 0 disables throttling.
    pub interval: u64,
    /// Force [`CoordinateMode::Document`] (`true`) or
    /// [`CoordinateMode::Anchored`] (`false`). By default absolutely positioned
    /// nodes use document mode.
    pub document_drag: Option<bool>,
    /// End the router chain after a qualifying `mousedown`.
    pub stop_down: bool,
    /// Distance in pixels the pointer must stray from the down position
    /// before the first move is processed.
    pub threshold: f64,
    /// Class put on the node while pressed.
    pub pressed_class: &'static str,
    /// Exact modifier combination required to start a gesture.
    pub key_mask: Option<KeyMask>,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            interval: 0,
            document_drag: None,
            stop_down: false,
            threshold: 0.0,
            pressed_class: PRESSED_CLASS,
            key_mask: None,
        }
    }
}

impl DragOptions {
    /// Sets [`interval`](Self::interval).
    #[must_use]
    pub const fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval;
        self
    }

    /// Sets [`document_drag`](Self::document_drag).
    #[must_use]
    pub const fn with_document_drag(mut self, document_drag: bool) -> Self {
        self.document_drag = Some(document_drag);
        self
    }

    /// Sets [`stop_down`](Self::stop_down).
    #[must_use]
    pub const fn with_stop_down(mut self, stop_down: bool) -> Self {
        self.stop_down = stop_down;
        self
    }

    /// Sets [`threshold`](Self::threshold).
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets [`pressed_class`](Self::pressed_class).
    #[must_use]
    pub const fn with_pressed_class(mut self, class: &'static str) -> Self {
        self.pressed_class = class;
        self
    }

    /// Sets [`key_mask`](Self::key_mask).
    #[must_use]
    pub const fn with_key_mask(mut self, mask: KeyMask) -> Self {
        self.key_mask = Some(mask);
        self
    }
}

/// Arguments of the drag callbacks. The variant selects the callback name.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    /// `"down"`: the gesture started.
    Down {
        /// Pointer position relative to the node.
        xy: Point,
    },
    /// `"move"`: the pointer moved.
    Move {
        /// Pointer position relative to the node.
        xy: Point,
        /// Page position, per [`CoordinateMode`].
        page: Point,
        /// Change in `xy` since the previous processed position.
        delta: Vec2,
    },
    /// `"up"`: the button was released.
    Up {
        /// Pointer position relative to the node.
        xy: Point,
    },
    /// `"out"`: the pointer left the node (anchored mode).
    Out {
        /// Pointer position relative to the node.
        xy: Point,
    },
    /// `"done"`: a gesture that moved has ended.
    Done {
        /// Final pointer position relative to the node.
        xy: Point,
    },
}

impl DragEvent {
    /// Pointer position relative to the node.
    pub fn xy(&self) -> Point {
        match *self {
            Self::Down { xy }
            | Self::Move { xy, .. }
            | Self::Up { xy }
            | Self::Out { xy }
            | Self::Done { xy } => xy,
        }
    }
}

impl CallbackArgs for DragEvent {
    fn callback_name(&self) -> &'static str {
        match self {
            Self::Down { .. } => "down",
            Self::Move { .. } => "move",
            Self::Up { .. } => "up",
            Self::Out { .. } => "out",
            Self::Done { .. } => "done",
        }
    }
}

/// Overridable steps run before the matching callback.
///
/// Hooks see the native event and may cancel it.
pub trait DragHooks: 'static {
    /// A gesture started.
    fn on_down(&mut self, _native: &mut NativeEvent, _xy: Point) {}
    /// The pointer moved.
    fn on_move(&mut self, _native: &mut NativeEvent, _xy: Point, _page: Point) {}
    /// The button was released.
    fn on_up(&mut self, _native: &mut NativeEvent, _xy: Point) {}
    /// The pointer left the node.
    fn on_out(&mut self, _native: &mut NativeEvent, _xy: Point) {}
}

/// Hooks that do nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl DragHooks for NoHooks {}

/// Start and last positions of a gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragTrack {
    /// Position at `mousedown`.
    pub start: Option<Point>,
    /// Last processed position.
    pub last: Option<Point>,
}

impl DragTrack {
    /// Begin tracking at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.start = Some(pos);
        self.last = Some(pos);
    }

    /// Record `pos`, returning the change since the last position.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start?;
        let delta = self.last.map(|last| pos - last);
        self.last = Some(pos);
        delta
    }

    /// Offset of `pos` from the start position.
    pub fn total_offset(&self, pos: Point) -> Option<Vec2> {
        self.start.map(|start| pos - start)
    }

    /// Forget both positions.
    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Whether a start position is recorded.
    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}

const HANDLED: &[EventType] = &[
    EventType::MouseDown,
    EventType::MouseMove,
    EventType::MouseUp,
    EventType::MouseOut,
    EventType::Click,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Finish {
    Up,
    Out,
}

struct DragInner<C: Control + ?Sized + 'static, H: DragHooks> {
    base: HandlerBase<C, DragEvent>,
    hooks: H,
    weak_self: Weak<RefCell<Self>>,
    doc: Rc<Document>,
    div: NodeId,
    mode: CoordinateMode,
    options: DragOptions,
    started: bool,
    dragging: bool,
    moved: bool,
    track: DragTrack,
    parent_position: Point,
    throttle_until: Option<u64>,
    saved_selection: Option<bool>,
    document_router: Option<Rc<EventRouter>>,
    tracking_document: bool,
}

impl<C: Control + ?Sized + 'static, H: DragHooks> DragInner<C, H> {
    fn node_xy(&self, native: &NativeEvent, given: Option<Point>) -> Point {
        given.unwrap_or_else(|| match self.base.router() {
            Some(router) => router.pointer_position(native),
            None => native.client,
        })
    }

    fn throttled(&mut self, now: u64) -> bool {
        match self.throttle_until {
            Some(deadline) if now < deadline => true,
            Some(_) => {
                self.throttle_until = None;
                false
            }
            None => false,
        }
    }

    fn ensure_document_router(&mut self) {
        if self.document_router.is_some() {
            return;
        }
        const KINDS: [EventType; 2] = [EventType::MouseMove, EventType::MouseUp];
        let router = EventRouter::new(
            self.doc.clone(),
            self.base.id(),
            &[],
            RouterOptions::default().with_fall_through(true),
        );
        match router.attach_to_node_with(self.doc.document_node(), &KINDS) {
            Ok(()) => {
                for kind in KINDS {
                    router.register(
                        kind.as_str(),
                        None,
                        document_listener(self.weak_self.clone(), kind),
                    );
                }
                self.document_router = Some(router);
            }
            Err(err) => tracing::warn!(%err, "could not observe the document"),
        }
    }

    fn drop_document_router(&mut self) {
        if let Some(router) = self.document_router.take() {
            router.destroy();
        }
    }

    fn leave_document_tracking(&mut self) {
        if self.tracking_document {
            self.tracking_document = false;
            self.doc.remove_class(self.doc.body(), DOCUMENT_DRAG_CLASS);
        }
    }

    fn restore_selection(&mut self) {
        if let Some(previous) = self.saved_selection.take() {
            self.doc.set_text_selection(previous);
        }
    }

    /// End the gesture without `up` or `done`.
    fn abandon(&mut self) {
        self.started = false;
        self.dragging = false;
        self.moved = false;
        self.track.end();
        self.throttle_until = None;
        self.doc.remove_class(self.div, self.options.pressed_class);
        self.leave_document_tracking();
        self.drop_document_router();
        self.restore_selection();
    }

    fn mouse_down(&mut self, native: &mut NativeEvent, given: Option<Point>) -> Response<DragEvent> {
        self.dragging = false;
        if !(self.base.check_modifiers(native.keys) && native.is_left_click()) {
            if self.started {
                tracing::debug!(handler = self.base.id().raw(), "drag abandoned by another press");
            }
            self.abandon();
            return Response::pass(Some(true));
        }
        let xy = self.node_xy(native, given);
        self.started = true;
        self.moved = false;
        self.throttle_until = None;
        self.track.start(xy);
        match self.mode {
            CoordinateMode::Anchored => {
                self.parent_position = self
                    .doc
                    .parent(self.div)
                    .map_or(Point::ORIGIN, |parent| self.doc.page_position(parent));
            }
            CoordinateMode::Document => self.ensure_document_router(),
        }
        self.doc.add_class(self.div, self.options.pressed_class);
        self.hooks.on_down(native, xy);
        native.stop(false);
        if self.saved_selection.is_none() {
            self.saved_selection = Some(self.doc.text_selection());
        }
        self.doc.set_text_selection(false);
        tracing::debug!(handler = self.base.id().raw(), x = xy.x, y = xy.y, "drag armed");

        let mut response = Response::pass(Some(!self.options.stop_down));
        response.push(DragEvent::Down { xy });
        response
    }

    fn mouse_move(&mut self, native: &mut NativeEvent, given: Option<Point>) -> Response<DragEvent> {
        if !self.started || self.throttled(native.time_ms) {
            return Response::pass(Some(true));
        }
        let xy = self.node_xy(native, given);
        if self.track.last == Some(xy) {
            return Response::pass(Some(true));
        }
        let start = self.track.start.unwrap_or(xy);
        if !self.dragging
            && self.options.threshold > 0.0
            && (xy - start).hypot() <= self.options.threshold
        {
            return Response::pass(Some(true));
        }
        if self.options.interval > 0 {
            self.throttle_until = Some(native.time_ms.saturating_add(self.options.interval));
        }
        self.dragging = true;
        self.moved = true;
        let page = match self.mode {
            CoordinateMode::Anchored => native.client - self.parent_position.to_vec2(),
            CoordinateMode::Document => native.client - start.to_vec2(),
        };
        let delta = self.track.update(xy).unwrap_or(Vec2::ZERO);
        self.hooks.on_move(native, xy, page);
        tracing::trace!(handler = self.base.id().raw(), x = xy.x, y = xy.y, "drag move");

        let mut response = Response::pass(Some(true));
        response.push(DragEvent::Move { xy, page, delta });
        response
    }

    fn finish(&mut self, native: &mut NativeEvent, xy: Point, how: Finish) -> Response<DragEvent> {
        if let Some(router) = self.base.router() {
            router.clear_mouse_cache();
        }
        let dragged = self.moved;
        self.started = false;
        self.dragging = false;
        self.throttle_until = None;
        self.doc.remove_class(self.div, self.options.pressed_class);
        self.leave_document_tracking();

        let mut response = Response::pass(Some(true));
        match how {
            Finish::Up => {
                self.hooks.on_up(native, xy);
                response.push(DragEvent::Up { xy });
            }
            Finish::Out => {
                self.hooks.on_out(native, xy);
                response.push(DragEvent::Out { xy });
            }
        }
        if dragged {
            response.push(DragEvent::Done { xy });
        }
        self.restore_selection();
        self.drop_document_router();
        tracing::debug!(handler = self.base.id().raw(), ?how, dragged, "drag finished");
        response
    }

    fn mouse_up(&mut self, native: &mut NativeEvent, given: Option<Point>) -> Response<DragEvent> {
        if !self.started {
            self.drop_document_router();
            return Response::pass(Some(true));
        }
        let xy = self.node_xy(native, given);
        self.finish(native, xy, Finish::Up)
    }

    fn mouse_out(&mut self, native: &mut NativeEvent, given: Option<Point>) -> Response<DragEvent> {
        if !self.started || !self.doc.mouse_left(native, self.div) {
            return Response::pass(Some(true));
        }
        match self.mode {
            CoordinateMode::Anchored => {
                let xy = self.node_xy(native, given);
                self.finish(native, xy, Finish::Out)
            }
            CoordinateMode::Document => {
                self.ensure_document_router();
                self.tracking_document = true;
                self.doc.add_class(self.doc.body(), DOCUMENT_DRAG_CLASS);
                tracing::debug!(handler = self.base.id().raw(), "drag continues on the document");
                Response::pass(Some(true))
            }
        }
    }

    /// Events from the document-level router.
    fn handle_document(&mut self, kind: EventType, event: &mut Event<'_>) -> Response<DragEvent> {
        let Some(native) = event.native.as_deref_mut() else {
            return Response::pass(None);
        };
        // The node's own router sees events inside the node.
        if !self.started || !self.tracking_document || self.doc.contains(self.div, native.target) {
            return Response::pass(Some(true));
        }
        match kind {
            EventType::MouseMove => self.mouse_move(native, None),
            EventType::MouseUp => self.mouse_up(native, None),
            _ => Response::pass(None),
        }
    }
}

impl<C: Control + ?Sized + 'static, H: DragHooks> BrowserHandler for DragInner<C, H> {
    type Control = C;
    type Args = DragEvent;

    fn base(&self) -> &HandlerBase<C, DragEvent> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HandlerBase<C, DragEvent> {
        &mut self.base
    }

    fn handled_events(&self) -> &'static [EventType] {
        HANDLED
    }

    fn handle(&mut self, kind: EventType, event: &mut Event<'_>) -> Response<DragEvent> {
        let given = event.xy;
        let Some(native) = event.native.as_deref_mut() else {
            return Response::pass(None);
        };
        match kind {
            EventType::MouseDown => self.mouse_down(native, given),
            EventType::MouseMove => {
                // Back inside the node.
                self.leave_document_tracking();
                self.mouse_move(native, given)
            }
            EventType::MouseUp => self.mouse_up(native, given),
            EventType::MouseOut => self.mouse_out(native, given),
            EventType::Click => Response::pass(Some(!self.moved)),
            _ => Response::pass(None),
        }
    }

    fn activated(&mut self) {
        self.dragging = false;
        self.doc.remove_class(self.div, self.options.pressed_class);
    }

    fn deactivated(&mut self) {
        self.abandon();
    }
}

impl<C: Control + ?Sized + 'static, H: DragHooks> Drop for DragInner<C, H> {
    fn drop(&mut self) {
        self.base.deactivate();
        self.abandon();
    }
}

fn document_listener<C, H>(handler: Weak<RefCell<DragInner<C, H>>>, kind: EventType) -> ListenerFn
where
    C: Control + ?Sized + 'static,
    H: DragHooks,
{
    listener(move |_, event| {
        let handler = handler.upgrade()?;
        run_handler(&handler, event, |h, ev| h.handle_document(kind, ev))
    })
}

/// Recognizes drag gestures on a control's node.
///
/// Dropping the recognizer deactivates it and abandons any gesture in
/// progress, as [`deactivate`](Self::deactivate) does.
pub struct DragRecognizer<C: Control + ?Sized + 'static, H: DragHooks = NoHooks> {
    inner: Rc<RefCell<DragInner<C, H>>>,
}

impl<C: Control + ?Sized + 'static, H: DragHooks> fmt::Debug for DragRecognizer<C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(inner) = self.inner.try_borrow() else {
            return f.debug_struct("DragRecognizer").finish_non_exhaustive();
        };
        f.debug_struct("DragRecognizer")
            .field("base", &inner.base)
            .field("div", &inner.div)
            .field("mode", &inner.mode)
            .field("options", &inner.options)
            .field("started", &inner.started)
            .field("dragging", &inner.dragging)
            .field("track", &inner.track)
            .field("throttle_until", &inner.throttle_until)
            .field("tracking_document", &inner.tracking_document)
            .finish_non_exhaustive()
    }
}

impl<C: Control + ?Sized + 'static> DragRecognizer<C, NoHooks> {
    /// A recognizer for `control` without hooks.
    ///
    /// Fails if the control's node is not live.
    pub fn new(
        control: Rc<C>,
        callbacks: Callbacks<C, DragEvent>,
        options: DragOptions,
    ) -> Result<Self, DomError> {
        Self::with_hooks(control, callbacks, options, NoHooks)
    }
}

impl<C: Control + ?Sized + 'static, H: DragHooks> DragRecognizer<C, H> {
    /// A recognizer for `control` running `hooks` before each callback.
    ///
    /// Reuses the control's router if it is bound to the control's node,
    /// otherwise installs a new one. The recognizer starts inactive.
    pub fn with_hooks(
        control: Rc<C>,
        callbacks: Callbacks<C, DragEvent>,
        options: DragOptions,
        hooks: H,
    ) -> Result<Self, DomError> {
        ensure_events(control.as_ref())?;
        let doc = control.document().clone();
        let div = control.div();
        let document_drag = options
            .document_drag
            .unwrap_or_else(|| doc.style_position(div) == Position::Absolute);
        let mode = if document_drag {
            CoordinateMode::Document
        } else {
            CoordinateMode::Anchored
        };
        let handler_options = HandlerOptions {
            key_mask: options.key_mask,
        };
        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<DragInner<C, H>>>| {
            RefCell::new(DragInner {
                base: HandlerBase::new(control, callbacks, handler_options),
                hooks,
                weak_self: weak.clone(),
                doc,
                div,
                mode,
                options,
                started: false,
                dragging: false,
                moved: false,
                track: DragTrack::default(),
                parent_position: Point::ORIGIN,
                throttle_until: None,
                saved_selection: None,
                document_router: None,
                tracking_document: false,
            })
        });
        Ok(Self { inner })
    }

    /// Start listening. `false` if already active.
    pub fn activate(&self) -> bool {
        handler::activate(&self.inner)
    }

    /// Stop listening, abandoning any gesture in progress without `up` or
    /// `done`. `false` if already inactive.
    pub fn deactivate(&self) -> bool {
        handler::deactivate(&self.inner)
    }

    /// Deactivate and release the control.
    pub fn destroy(&self) {
        handler::destroy(&self.inner);
    }

    fn read<R>(&self, f: impl FnOnce(&DragInner<C, H>) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// The recognizer's context; its listeners are bound to it.
    pub fn id(&self) -> ContextId {
        self.read(|d| d.base.id())
    }

    /// Whether the recognizer is listening.
    pub fn is_active(&self) -> bool {
        self.read(|d| d.base.is_active())
    }

    /// Whether a gesture is in progress.
    pub fn is_started(&self) -> bool {
        self.read(|d| d.started)
    }

    /// Whether the current gesture has moved.
    pub fn is_dragging(&self) -> bool {
        self.read(|d| d.dragging)
    }

    /// Position recorded at the latest qualifying `mousedown`.
    pub fn start(&self) -> Option<Point> {
        self.read(|d| d.track.start)
    }

    /// Last processed position.
    pub fn last(&self) -> Option<Point> {
        self.read(|d| d.track.last)
    }

    /// Coordinate mode, fixed at construction.
    pub fn mode(&self) -> CoordinateMode {
        self.read(|d| d.mode)
    }

    /// Configuration.
    pub fn options(&self) -> DragOptions {
        self.read(|d| d.options)
    }

    /// The controlling object, until [`destroy`](Self::destroy).
    pub fn control(&self) -> Option<Rc<C>> {
        self.read(|d| d.base.control().cloned())
    }

    /// Whether the document-level router exists.
    pub fn has_document_router(&self) -> bool {
        self.read(|d| d.document_router.is_some())
    }

    /// Whether moves and ups are being taken from the document.
    pub fn is_tracking_document(&self) -> bool {
        self.read(|d| d.tracking_document)
    }

    /// Timestamp before which moves are skipped.
    pub fn throttle_deadline(&self) -> Option<u64> {
        self.read(|d| d.throttle_until)
    }

    /// Let the next move through regardless of the throttle.
    pub fn release_throttle(&self) {
        self.inner.borrow_mut().throttle_until = None;
    }

    /// Whether `keys` pass the configured modifier mask.
    pub fn check_modifiers(&self, keys: KeyState) -> bool {
        self.read(|d| d.base.check_modifiers(keys))
    }

    /// Invoke the callback named `name` with the control.
    pub fn invoke_callback(&self, name: &str, args: &DragEvent) -> bool {
        let Some((callback, control)) = self.read(|d| d.base.bound_callback(name)) else {
            return false;
        };
        callback(control.as_ref(), args);
        true
    }

    /// Run `f` against the hooks.
    pub fn hooks<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        self.read(|d| f(&d.hooks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_reports_incremental_deltas_and_total_offset() {
        let mut track = DragTrack::default();
        assert_eq!(track.update(Point::new(1.0, 1.0)), None);
        assert!(!track.is_tracking());

        track.start(Point::new(10.0, 10.0));
        assert_eq!(track.update(Point::new(15.0, 12.0)), Some(Vec2::new(5.0, 2.0)));
        assert_eq!(track.update(Point::new(20.0, 20.0)), Some(Vec2::new(5.0, 8.0)));
        assert_eq!(track.total_offset(Point::new(20.0, 20.0)), Some(Vec2::new(10.0, 10.0)));

        track.end();
        assert_eq!(track, DragTrack::default());
    }

    #[test]
    fn callback_names_follow_variants() {
        let p = Point::ZERO;
        let names: Vec<_> = [
            DragEvent::Down { xy: p },
            DragEvent::Move {
                xy: p,
                page: p,
                delta: Vec2::ZERO,
            },
            DragEvent::Up { xy: p },
            DragEvent::Out { xy: p },
            DragEvent::Done { xy: p },
        ]
        .iter()
        .map(CallbackArgs::callback_name)
        .collect();
        assert_eq!(names, ["down", "move", "up", "out", "done"]);
    }

    #[test]
    fn options_builders() {
        let options = DragOptions::default()
            .with_interval(20)
            .with_document_drag(true)
            .with_threshold(3.0)
            .with_key_mask(KeyMask::ALT);
        assert_eq!(options.interval, 20);
        assert_eq!(options.document_drag, Some(true));
        assert_eq!(options.pressed_class, PRESSED_CLASS);
        assert_eq!(options.key_mask, Some(KeyMask::ALT));
        assert!(!options.stop_down);
    }
}

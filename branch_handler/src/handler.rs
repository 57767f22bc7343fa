// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler plumbing shared by every input handler.
//!
//! A handler is a state machine fed by the browser channels of its control's
//! [`EventRouter`]. The pieces:
//!
//! - [`HandlerBase`]: the state every handler carries (its id, the control,
//!   the named callback table, the modifier mask, activation bookkeeping).
//! - [`BrowserHandler`]: implemented by a concrete handler. It lists the
//!   browser events it wants and turns each one into a [`Response`].
//! - [`activate`] / [`deactivate`] / [`destroy`]: drive a shared
//!   `Rc<RefCell<H>>` handler through its lifecycle.
//!
//! ## Callbacks run after the handler is released
//!
//! [`BrowserHandler::handle`] does not call application code. It returns the
//! callbacks to fire as [`Response::emit`], and the listener runs them once
//! the handler's `RefCell` borrow has ended. Callbacks may therefore
//! deactivate the handler, dispatch further events or destroy the router.

use core::cell::RefCell;
use core::fmt;
use std::rc::{Rc, Weak};

use branch_dom::{EventType, KeyState};
use branch_events::{ContextId, Event, EventRouter, ListenerFn, listener};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::control::Control;
use crate::modifiers::KeyMask;

/// Arguments handed to a named callback.
pub trait CallbackArgs {
    /// Name of the callback these arguments are for.
    fn callback_name(&self) -> &'static str;
}

/// A named callback: receives the control and the arguments.
pub type HandlerCallback<C, A> = Rc<dyn Fn(&C, &A)>;

/// Callback table keyed by name.
pub struct Callbacks<C: ?Sized, A> {
    table: HashMap<&'static str, HandlerCallback<C, A>>,
}

impl<C: ?Sized, A> Default for Callbacks<C, A> {
    fn default() -> Self {
        Self {
            table: HashMap::new(),
        }
    }
}

impl<C: ?Sized, A> fmt::Debug for Callbacks<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.table.keys().copied().collect();
        names.sort_unstable();
        f.debug_struct("Callbacks").field("names", &names).finish()
    }
}

impl<C: ?Sized, A> Callbacks<C, A> {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a callback under `name`, replacing any previous one.
    #[must_use]
    pub fn on(mut self, name: &'static str, f: impl Fn(&C, &A) + 'static) -> Self {
        self.table.insert(name, Rc::new(f));
        self
    }

    /// Insert a callback under `name`, returning the one it replaced.
    pub fn insert(
        &mut self,
        name: &'static str,
        callback: HandlerCallback<C, A>,
    ) -> Option<HandlerCallback<C, A>> {
        self.table.insert(name, callback)
    }

    /// The callback registered under `name`.
    pub fn get(&self, name: &str) -> Option<&HandlerCallback<C, A>> {
        self.table.get(name)
    }

    /// Whether a callback is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Number of callbacks.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Handler configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandlerOptions {
    /// Exact modifier combination required; `None` accepts any.
    pub key_mask: Option<KeyMask>,
}

impl HandlerOptions {
    /// Sets [`key_mask`](Self::key_mask).
    #[must_use]
    pub const fn with_key_mask(mut self, mask: KeyMask) -> Self {
        self.key_mask = Some(mask);
        self
    }
}

/// What a handler decided about one event.
#[derive(Clone, Debug, PartialEq)]
pub struct Response<A> {
    /// Listener return value; `Some(false)` ends the router's chain.
    pub result: Option<bool>,
    /// Callbacks to fire, in order, once the handler is released.
    pub emit: SmallVec<[A; 2]>,
}

impl<A> Response<A> {
    /// A response with no callbacks.
    pub fn pass(result: Option<bool>) -> Self {
        Self {
            result,
            emit: SmallVec::new(),
        }
    }

    /// Queue a callback.
    pub fn push(&mut self, args: A) {
        self.emit.push(args);
    }
}

/// State shared by every handler.
pub struct HandlerBase<C: ?Sized, A> {
    id: ContextId,
    control: Option<Rc<C>>,
    callbacks: Callbacks<C, A>,
    options: HandlerOptions,
    active: bool,
    registered: SmallVec<[(EventType, ListenerFn); 6]>,
    router: Option<Rc<EventRouter>>,
}

impl<C: ?Sized, A> fmt::Debug for HandlerBase<C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBase")
            .field("id", &self.id)
            .field("has_control", &self.control.is_some())
            .field("callbacks", &self.callbacks)
            .field("options", &self.options)
            .field("active", &self.active)
            .field(
                "registered",
                &self.registered.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl<C: Control + ?Sized, A: CallbackArgs> HandlerBase<C, A> {
    /// A new, inactive handler state for `control`.
    pub fn new(control: Rc<C>, callbacks: Callbacks<C, A>, options: HandlerOptions) -> Self {
        Self {
            id: ContextId::next(),
            control: Some(control),
            callbacks,
            options,
            active: false,
            registered: SmallVec::new(),
            router: None,
        }
    }

    /// The handler's own context; its router listeners are bound to it.
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// The controlling object, until [`destroy`](Self::destroy).
    pub fn control(&self) -> Option<&Rc<C>> {
        self.control.as_ref()
    }

    /// Configuration.
    pub fn options(&self) -> HandlerOptions {
        self.options
    }

    /// Whether the handler is listening.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The router the handler is registered on while active.
    pub fn router(&self) -> Option<&Rc<EventRouter>> {
        self.router.as_ref()
    }

    /// Whether the modifiers in `keys` pass the configured mask.
    pub fn check_modifiers(&self, keys: KeyState) -> bool {
        self.options.key_mask.is_none_or(|mask| mask.matches(keys))
    }

    /// Priority-register one listener per event kind on the control's router.
    ///
    /// Returns `false` if already active or if the control has no router.
    pub fn activate(
        &mut self,
        kinds: &[EventType],
        mut make_listener: impl FnMut(EventType) -> ListenerFn,
    ) -> bool {
        if self.active {
            return false;
        }
        let Some(router) = self.control.as_ref().and_then(|c| c.events()) else {
            tracing::warn!(handler = self.id.raw(), "activate without a router");
            return false;
        };
        for &kind in kinds {
            let callback = make_listener(kind);
            if router
                .register_priority(kind.as_str(), Some(self.id), callback.clone())
                .is_some()
            {
                self.registered.push((kind, callback));
            }
        }
        self.router = Some(router);
        self.active = true;
        tracing::debug!(handler = self.id.raw(), listeners = self.registered.len(), "activated");
        true
    }

    /// Remove every listener [`activate`](Self::activate) registered.
    ///
    /// Returns `false` if already inactive.
    pub fn deactivate(&mut self) -> bool {
        if !self.active {
            return false;
        }
        if let Some(router) = self.router.take() {
            for (kind, callback) in &self.registered {
                router.unregister(kind.as_str(), Some(self.id), Some(callback));
            }
        }
        self.registered.clear();
        self.active = false;
        tracing::debug!(handler = self.id.raw(), "deactivated");
        true
    }

    /// The callback registered for `name`, paired with the control.
    pub fn bound_callback(&self, name: &str) -> Option<(HandlerCallback<C, A>, Rc<C>)> {
        let control = self.control.clone()?;
        let callback = self.callbacks.get(name)?.clone();
        Some((callback, control))
    }

    /// Invoke the callback named `name` with the control; `false` if there is
    /// no such callback or no control.
    pub fn invoke_callback(&self, name: &str, args: &A) -> bool {
        match self.bound_callback(name) {
            Some((callback, control)) => {
                callback(control.as_ref(), args);
                true
            }
            None => false,
        }
    }

    /// Deactivate and drop the control.
    pub fn destroy(&mut self) {
        self.deactivate();
        self.control = None;
    }
}

/// A concrete handler driven by its control's router.
pub trait BrowserHandler: 'static {
    /// The controlling object.
    type Control: Control + ?Sized;
    /// Callback arguments.
    type Args: CallbackArgs;

    /// Shared handler state.
    fn base(&self) -> &HandlerBase<Self::Control, Self::Args>;

    /// Shared handler state, mutably.
    fn base_mut(&mut self) -> &mut HandlerBase<Self::Control, Self::Args>;

    /// Browser events this handler responds to.
    fn handled_events(&self) -> &'static [EventType];

    /// React to one browser event.
    fn handle(&mut self, kind: EventType, event: &mut Event<'_>) -> Response<Self::Args>;

    /// Called after a successful activation.
    fn activated(&mut self) {}

    /// Called after a successful deactivation.
    fn deactivated(&mut self) {}
}

/// Run `f` against the handler, then fire the callbacks it queued.
///
/// Re-entrant calls (a hook dispatching into the same handler) are dropped.
pub fn run_handler<H, F>(handler: &Rc<RefCell<H>>, event: &mut Event<'_>, f: F) -> Option<bool>
where
    H: BrowserHandler,
    F: FnOnce(&mut H, &mut Event<'_>) -> Response<H::Args>,
{
    let Ok(mut h) = handler.try_borrow_mut() else {
        tracing::warn!(kind = ?event.kind(), "re-entrant handler call dropped");
        return None;
    };
    let response = f(&mut *h, event);
    let result = response.result;
    let bound: SmallVec<[_; 2]> = response
        .emit
        .into_iter()
        .filter_map(|args| {
            h.base()
                .bound_callback(args.callback_name())
                .map(|(callback, control)| (callback, control, args))
        })
        .collect();
    drop(h);
    for (callback, control, args) in &bound {
        callback(control.as_ref(), args);
    }
    result
}

/// A router listener feeding `kind` events into `handler`.
pub fn handler_listener<H: BrowserHandler>(handler: Weak<RefCell<H>>, kind: EventType) -> ListenerFn {
    listener(move |_, event| {
        let handler = handler.upgrade()?;
        run_handler(&handler, event, |h, ev| h.handle(kind, ev))
    })
}

/// Activate a shared handler. `false` if it was already active.
pub fn activate<H: BrowserHandler>(handler: &Rc<RefCell<H>>) -> bool {
    let weak = Rc::downgrade(handler);
    let Ok(mut h) = handler.try_borrow_mut() else {
        return false;
    };
    let kinds = h.handled_events();
    if !h
        .base_mut()
        .activate(kinds, |kind| handler_listener(weak.clone(), kind))
    {
        return false;
    }
    h.activated();
    true
}

/// Deactivate a shared handler. `false` if it was already inactive.
pub fn deactivate<H: BrowserHandler>(handler: &Rc<RefCell<H>>) -> bool {
    let Ok(mut h) = handler.try_borrow_mut() else {
        return false;
    };
    if !h.base_mut().deactivate() {
        return false;
    }
    h.deactivated();
    true
}

/// Deactivate a shared handler and drop its control.
pub fn destroy<H: BrowserHandler>(handler: &Rc<RefCell<H>>) {
    deactivate(handler);
    if let Ok(mut h) = handler.try_borrow_mut() {
        h.base_mut().destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlBase, ensure_events};
    use branch_dom::{Document, Element, KeyState, NativeEvent, NodeId};
    use core::cell::Cell;
    use kurbo::Point;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Pressed(Point);

    impl CallbackArgs for Pressed {
        fn callback_name(&self) -> &'static str {
            "pressed"
        }
    }

    /// Emits `pressed` on every qualifying mousedown and ends the chain.
    struct Presser {
        base: HandlerBase<ControlBase, Pressed>,
        downs: usize,
    }

    impl BrowserHandler for Presser {
        type Control = ControlBase;
        type Args = Pressed;

        fn base(&self) -> &HandlerBase<ControlBase, Pressed> {
            &self.base
        }

        fn base_mut(&mut self) -> &mut HandlerBase<ControlBase, Pressed> {
            &mut self.base
        }

        fn handled_events(&self) -> &'static [EventType] {
            &[EventType::MouseDown]
        }

        fn handle(&mut self, _kind: EventType, event: &mut Event<'_>) -> Response<Pressed> {
            let Some(native) = event.native.as_deref() else {
                return Response::pass(None);
            };
            if !self.base.check_modifiers(native.keys) {
                return Response::pass(Some(true));
            }
            self.downs += 1;
            let mut response = Response::pass(Some(false));
            response.push(Pressed(native.client));
            response
        }
    }

    fn setup(
        options: HandlerOptions,
        callbacks: Callbacks<ControlBase, Pressed>,
    ) -> (Rc<Document>, NodeId, Rc<ControlBase>, Rc<RefCell<Presser>>) {
        let doc = Rc::new(Document::new());
        let div = doc.append(doc.body(), Element::default()).unwrap();
        let control = Rc::new(ControlBase::new(doc.clone(), div));
        ensure_events(control.as_ref()).unwrap();
        let handler = Rc::new(RefCell::new(Presser {
            base: HandlerBase::new(control.clone(), callbacks, options),
            downs: 0,
        }));
        (doc, div, control, handler)
    }

    #[test]
    fn activation_is_idempotent() {
        let (doc, div, control, handler) = setup(HandlerOptions::default(), Callbacks::new());
        let router = control.events().unwrap();
        let natives = doc.native_listener_count(div);

        assert!(activate(&handler));
        assert_eq!(router.listener_count("mousedown"), 1);
        assert!(!activate(&handler));
        assert_eq!(router.listener_count("mousedown"), 1);
        assert_eq!(doc.native_listener_count(div), natives);

        assert!(deactivate(&handler));
        assert!(!deactivate(&handler));
        assert_eq!(router.listener_count("mousedown"), 0);
    }

    #[test]
    fn callbacks_receive_the_control() {
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        let callbacks = Callbacks::new().on("pressed", move |control: &ControlBase, args: &Pressed| {
            sink.set(Some((control.div(), args.0)));
        });
        let (doc, div, _, handler) = setup(HandlerOptions::default(), callbacks);
        activate(&handler);

        doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::new(3.0, 4.0)));
        assert_eq!(seen.get(), Some((div, Point::new(3.0, 4.0))));
    }

    #[test]
    fn priority_handler_runs_before_application_listeners() {
        let (doc, div, control, handler) = setup(HandlerOptions::default(), Callbacks::new());
        let router = control.events().unwrap();
        let app_ran = Rc::new(Cell::new(false));
        let flag = app_ran.clone();
        router.register(
            "mousedown",
            None,
            listener(move |_, _| {
                flag.set(true);
                None
            }),
        );
        activate(&handler);

        doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::ZERO));
        assert_eq!(handler.borrow().downs, 1);
        assert!(!app_ran.get());
    }

    #[test]
    fn key_mask_filters_events() {
        let options = HandlerOptions::default().with_key_mask(KeyMask::SHIFT);
        let (doc, div, _, handler) = setup(options, Callbacks::new());
        activate(&handler);

        let both = KeyState::SHIFT.with_ctrl();
        doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::ZERO).with_keys(both));
        assert_eq!(handler.borrow().downs, 0);
        doc.fire(
            NativeEvent::mouse(EventType::MouseDown, div, Point::ZERO)
                .with_keys(KeyState::SHIFT),
        );
        assert_eq!(handler.borrow().downs, 1);
    }

    #[test]
    fn callbacks_may_deactivate_the_handler() {
        let slot: Rc<RefCell<Option<Weak<RefCell<Presser>>>>> = Rc::default();
        let target = slot.clone();
        let callbacks = Callbacks::new().on("pressed", move |_: &ControlBase, _: &Pressed| {
            if let Some(h) = target.borrow().as_ref().and_then(Weak::upgrade) {
                assert!(deactivate(&h));
            }
        });
        let (doc, div, control, handler) = setup(HandlerOptions::default(), callbacks);
        *slot.borrow_mut() = Some(Rc::downgrade(&handler));
        activate(&handler);

        doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::ZERO));
        assert!(!handler.borrow().base().is_active());
        assert_eq!(control.events().unwrap().listener_count("mousedown"), 0);
    }

    #[test]
    fn destroy_drops_control_and_listeners() {
        let (_, _, control, handler) = setup(HandlerOptions::default(), Callbacks::new());
        activate(&handler);
        destroy(&handler);
        assert!(handler.borrow().base().control().is_none());
        assert_eq!(control.events().unwrap().listener_count("mousedown"), 0);
        assert!(!handler.borrow().base().invoke_callback("pressed", &Pressed(Point::ZERO)));
    }
}

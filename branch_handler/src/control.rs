// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The controlling object a handler works for.

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use branch_dom::{Document, DomError, NodeId};
use branch_events::{ContextId, EventRouter, RouterOptions};
use kurbo::Point;

/// What a handler needs from the object that owns it.
///
/// Implementations use interior mutability: controls are shared through
/// `Rc` between the application and every handler attached to them.
pub trait Control {
    /// Context the control's listeners and callbacks are bound to.
    fn context(&self) -> ContextId;

    /// The node whose geometry anchors pointer coordinates.
    fn div(&self) -> NodeId;

    /// The document the node lives in.
    fn document(&self) -> &Rc<Document>;

    /// The control's event router, if it has one.
    fn events(&self) -> Option<Rc<EventRouter>>;

    /// Replace the control's event router.
    fn set_events(&self, events: Rc<EventRouter>);

    /// Reposition the control's node.
    fn move_to(&self, _position: Point) {}
}

/// The control's router if it is bound to the control's node; otherwise a
/// new router bound there (with `include_xy`), installed on the control.
pub fn ensure_events<C: Control + ?Sized>(control: &C) -> Result<Rc<EventRouter>, DomError> {
    let div = control.div();
    if let Some(events) = control.events()
        && events.element() == Some(div)
    {
        return Ok(events);
    }
    let events = EventRouter::attached(
        control.document().clone(),
        control.context(),
        div,
        &[],
        RouterOptions::default().with_include_xy(true),
    )?;
    control.set_events(events.clone());
    Ok(events)
}

/// A minimal control: a node in a document, positioned with [`move_to`](Control::move_to).
pub struct ControlBase {
    context: ContextId,
    doc: Rc<Document>,
    div: NodeId,
    events: RefCell<Option<Rc<EventRouter>>>,
}

impl fmt::Debug for ControlBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlBase")
            .field("context", &self.context)
            .field("div", &self.div)
            .field("events", &self.events.borrow().as_ref().map(|e| e.object()))
            .finish_non_exhaustive()
    }
}

impl ControlBase {
    /// A control for `div`, without a router yet.
    pub fn new(doc: Rc<Document>, div: NodeId) -> Self {
        Self {
            context: ContextId::next(),
            doc,
            div,
            events: RefCell::new(None),
        }
    }

    /// Sets the initial router.
    #[must_use]
    pub fn with_events(self, events: Rc<EventRouter>) -> Self {
        *self.events.borrow_mut() = Some(events);
        self
    }
}

impl Control for ControlBase {
    fn context(&self) -> ContextId {
        self.context
    }

    fn div(&self) -> NodeId {
        self.div
    }

    fn document(&self) -> &Rc<Document> {
        &self.doc
    }

    fn events(&self) -> Option<Rc<EventRouter>> {
        self.events.borrow().clone()
    }

    fn set_events(&self, events: Rc<EventRouter>) {
        *self.events.borrow_mut() = Some(events);
    }

    fn move_to(&self, position: Point) {
        if let Err(err) = self.doc.update(self.div, |el| el.offset = position.to_vec2()) {
            tracing::debug!(%err, "move_to on a detached control");
        }
        if let Some(events) = self.events() {
            events.clear_mouse_cache();
        }
    }
}

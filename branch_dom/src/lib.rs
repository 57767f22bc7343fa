// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Branch DOM: the document host the Branch event kernel runs against.
//!
//! The kernel never talks to a browser directly. Everything it needs from
//! one goes through [`Document`]:
//!
//! - **Nodes and geometry**: an arena of elements addressed by generational
//!   [`NodeId`] handles, with the offsets, scroll positions, CSS `position`
//!   and class lists that the coordinate math consumes
//!   ([`Document::page_position`], [`Document::mouse_left`], class helpers).
//! - **Native events**: [`NativeEvent`] values delivered with
//!   [`Document::fire`] along a capture → target → bubble path.
//! - **The listener cache**: the single registry through which native
//!   listeners are attached and detached ([`listener`]). It is owned by the
//!   document, keyed by a lazily assigned [`ElementIdentity`], and torn down
//!   automatically when a node is removed.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::{Point, Size, Vec2};
//! use branch_dom::{Document, Element, EventType, NativeEvent, native_callback};
//!
//! let doc = Document::new();
//! let div = doc
//!     .append(doc.body(), Element::at(Vec2::new(20.0, 30.0), Size::new(100.0, 100.0)))
//!     .unwrap();
//! assert_eq!(doc.page_position(div), Point::new(20.0, 30.0));
//!
//! let downs = Rc::new(Cell::new(0));
//! let seen = downs.clone();
//! doc.observe(div, EventType::MouseDown, native_callback(move |_| seen.set(seen.get() + 1)), false)
//!     .unwrap();
//! doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::new(25.0, 35.0)));
//! assert_eq!(downs.get(), 1);
//!
//! // Removing the node drops its subscriptions.
//! doc.remove_node(div).unwrap();
//! assert_eq!(doc.subscription_count(div), 0);
//! ```
//!
//! ## Errors
//!
//! Lookups that find nothing are not errors. Handing the host a node handle
//! it cannot resolve is: such calls fail with a [`DomError`].

mod document;
mod error;
mod event;
pub mod listener;
mod node;

pub use document::Document;
pub use error::DomError;
pub use event::{EventType, KeyState, MouseButton, NativeEvent};
pub use listener::{
    ElementIdentity, ListenerCache, NativeCallback, NativeTarget, Quirks, Subscription,
    native_callback,
};
pub use node::{Element, NodeId, Position};

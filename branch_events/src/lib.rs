// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Branch Events: the application event bus layered over native input.
//!
//! Each application object that emits or consumes events owns an
//! [`EventRouter`]. A router holds named [`Channel`]s of listeners; attaching
//! it to a document node makes every browser event on that node flow into
//! the channel of the same name.
//!
//! - Listeners are `{context, callback}` records ([`Listener`]). The context
//!   is passed to the callback explicitly; there is no receiver rebinding.
//! - [`EventRouter::register_priority`] puts a listener at the head of its
//!   channel. Gesture handlers use it to see input first.
//! - A listener returning `Some(false)` stops the rest of the chain.
//! - With [`RouterOptions::include_xy`] each translated event carries the
//!   pointer position relative to the node, computed from a
//!   [`MouseOffsetCache`].
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use branch_dom::Document;
//! use branch_events::{ContextId, EventRouter, RouterOptions, listener};
//!
//! let doc = Rc::new(Document::new());
//! let router = EventRouter::new(doc, ContextId::next(), &["loadend"], RouterOptions::default());
//!
//! let order = Rc::new(RefCell::new(Vec::new()));
//! let (a, b) = (order.clone(), order.clone());
//! router.register("loadend", None, listener(move |_, _| { a.borrow_mut().push("plain"); None }));
//! router.register_priority("loadend", None, listener(move |_, _| { b.borrow_mut().push("priority"); None }));
//!
//! router.trigger("loadend");
//! assert_eq!(*order.borrow(), ["priority", "plain"]);
//! ```

mod channel;
mod context;
mod event;
mod offset;
mod router;

pub use channel::{Channel, Listener, ListenerFn, listener};
pub use context::ContextId;
pub use event::Event;
pub use offset::MouseOffsetCache;
pub use router::{BROWSER_EVENTS, EventRouter, ListenerHandle, RouterOptions};

// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Branch Handler: input handlers that sit on a control's event router.
//!
//! - [`control`]: the [`Control`] seam handlers work against, and
//!   [`ControlBase`], a minimal implementation.
//! - [`handler`]: [`HandlerBase`] and the [`BrowserHandler`] trait. Handlers
//!   register with priority on their control's router so they see browser
//!   events before application listeners do.
//! - [`drag`]: [`DragRecognizer`], the drag-gesture state machine.
//! - [`KeyMask`]: exact modifier-key matching.
//!
//! The data flow for one native event:
//!
//! ```text
//! Document::fire → router native callback → EventRouter::dispatch
//!   → handler listener (priority) → state transition → named callbacks
//!   → application listeners (unless the handler ended the chain)
//! ```
//!
//! All of this is single-threaded and synchronous. Shared state lives in
//! `Rc`/`RefCell`, and no borrow is held while application code runs.

pub mod control;
pub mod drag;
pub mod handler;
mod modifiers;

pub use control::{Control, ControlBase, ensure_events};
pub use drag::{
    CoordinateMode, DOCUMENT_DRAG_CLASS, DragEvent, DragHooks, DragOptions, DragRecognizer,
    DragTrack, NoHooks, PRESSED_CLASS,
};
pub use handler::{
    BrowserHandler, CallbackArgs, Callbacks, HandlerBase, HandlerCallback, HandlerOptions,
    Response,
};
pub use modifiers::KeyMask;

// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channels: named, ordered listener lists.
//!
//! A [`Channel`] is a plain ordered list of [`Listener`] records. Ordinary
//! registration appends, priority registration prepends, and dispatch walks
//! head to tail, so priority listeners always run before ordinary ones.
//!
//! ```
//! use branch_events::{Channel, ContextId, Listener, listener};
//!
//! let ctx = ContextId::from_raw(7);
//! let a = listener(|_, _| None);
//! let b = listener(|_, _| Some(false));
//!
//! let mut channel = Channel::default();
//! channel.push(Listener::new(ctx, a.clone()));
//! channel.push_front(Listener::new(ctx, b.clone()));
//! assert_eq!(channel.len(), 2);
//!
//! // Removal without a callback drops only the first entry for the context.
//! assert!(channel.remove_first(ctx, None));
//! assert_eq!(channel.len(), 1);
//! ```

use core::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::context::ContextId;
use crate::event::Event;

/// Listener callback.
///
/// Receives the listener's bound context and the event. Returning
/// `Some(false)` stops the chain; any other value lets it continue. The last
/// value returned becomes the result of the dispatch.
pub type ListenerFn = Rc<dyn Fn(ContextId, &mut Event<'_>) -> Option<bool>>;

/// Wrap a closure as a [`ListenerFn`].
pub fn listener<F>(f: F) -> ListenerFn
where
    F: Fn(ContextId, &mut Event<'_>) -> Option<bool> + 'static,
{
    Rc::new(f)
}

/// A `{context, callback}` record.
#[derive(Clone)]
pub struct Listener {
    /// Context the callback is bound to.
    pub context: ContextId,
    /// The callback.
    pub callback: ListenerFn,
}

impl Listener {
    /// Bind `callback` to `context`.
    pub fn new(context: ContextId, callback: ListenerFn) -> Self {
        Self { context, callback }
    }

    /// Whether this record belongs to `context` and, when given, is `callback`.
    pub fn matches(&self, context: ContextId, callback: Option<&ListenerFn>) -> bool {
        self.context == context && callback.is_none_or(|cb| Rc::ptr_eq(cb, &self.callback))
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// An ordered listener list.
#[derive(Clone, Debug, Default)]
pub struct Channel {
    listeners: SmallVec<[Listener; 4]>,
}

impl Channel {
    /// Append a listener.
    pub fn push(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Insert a listener ahead of every existing one.
    pub fn push_front(&mut self, listener: Listener) {
        self.listeners.insert(0, listener);
    }

    /// Remove the first entry matching `context` (and `callback`, if given).
    pub fn remove_first(&mut self, context: ContextId, callback: Option<&ListenerFn>) -> bool {
        match self.listeners.iter().position(|l| l.matches(context, callback)) {
            Some(pos) => {
                self.listeners.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Remove every entry bound to `context`; returns how many were removed.
    pub fn remove_context(&mut self, context: ContextId) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.context != context);
        before - self.listeners.len()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether the channel has no entries.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// The entries, head first.
    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    /// A copy of the entries for iteration that tolerates concurrent edits.
    pub fn snapshot(&self) -> SmallVec<[Listener; 4]> {
        self.listeners.clone()
    }
}

// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native input events delivered by the document host.
//!
//! A [`NativeEvent`] is what a browser would hand to an `addEventListener`
//! callback: a type, a target, pointer coordinates in the viewport frame
//! (`clientX`/`clientY`), the pressed button, modifier keys, and the two
//! cancellation flags.
//!
//! ```
//! use kurbo::Point;
//! use branch_dom::{Document, EventType, NativeEvent};
//!
//! let doc = Document::new();
//! let mut ev = NativeEvent::mouse(EventType::MouseDown, doc.body(), Point::new(4.0, 2.0));
//! assert!(ev.is_left_click());
//!
//! ev.stop(true);
//! assert!(ev.propagation_stopped());
//! assert!(!ev.default_prevented());
//! ```

use core::fmt;

use kurbo::Point;

use crate::node::NodeId;

/// The native event types understood by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Pointer entered a node.
    MouseOver,
    /// Pointer left a node.
    MouseOut,
    /// A mouse button was pressed.
    MouseDown,
    /// A mouse button was released.
    MouseUp,
    /// The pointer moved.
    MouseMove,
    /// Primary-button click.
    Click,
    /// Primary-button double click.
    DblClick,
    /// Secondary-button click.
    RightClick,
    /// Secondary-button double click.
    DblRightClick,
    /// The node was resized.
    Resize,
    /// The node gained focus.
    Focus,
    /// The node lost focus.
    Blur,
    /// Native drag-and-drop started on the node.
    DragStart,
    /// The viewport scrolled.
    Scroll,
    /// A printable key was pressed.
    KeyPress,
    /// A key went down.
    KeyDown,
    /// A key went up.
    KeyUp,
    /// Text selection is about to start.
    SelectStart,
    /// The page is being unloaded.
    Unload,
}

impl EventType {
    /// The DOM name of this event type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::RightClick => "rightclick",
            Self::DblRightClick => "dblrightclick",
            Self::Resize => "resize",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::DragStart => "dragstart",
            Self::Scroll => "scroll",
            Self::KeyPress => "keypress",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::SelectStart => "selectstart",
            Self::Unload => "unload",
        }
    }

    /// Parse a DOM event name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "mouseover" => Self::MouseOver,
            "mouseout" => Self::MouseOut,
            "mousedown" => Self::MouseDown,
            "mouseup" => Self::MouseUp,
            "mousemove" => Self::MouseMove,
            "click" => Self::Click,
            "dblclick" => Self::DblClick,
            "rightclick" => Self::RightClick,
            "dblrightclick" => Self::DblRightClick,
            "resize" => Self::Resize,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "dragstart" => Self::DragStart,
            "scroll" => Self::Scroll,
            "keypress" => Self::KeyPress,
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "selectstart" => Self::SelectStart,
            "unload" => Self::Unload,
            _ => return None,
        })
    }

    /// Whether events of this type bubble from the target to its ancestors.
    pub const fn bubbles(self) -> bool {
        !matches!(
            self,
            Self::Focus | Self::Blur | Self::Resize | Self::Scroll | Self::Unload
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which mouse button an event refers to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// No button information (keyboard, focus and resize events).
    #[default]
    None,
    /// The primary (usually left) button.
    Primary,
    /// The auxiliary (usually middle) button.
    Auxiliary,
    /// The secondary (usually right) button.
    Secondary,
}

/// Modifier keys held while an event was produced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyState {
    /// Shift is down.
    pub shift: bool,
    /// Control is down.
    pub ctrl: bool,
    /// Alt is down.
    pub alt: bool,
}

impl KeyState {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Only Shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Returns a copy with Ctrl set.
    pub const fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Returns a copy with Alt set.
    pub const fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Returns a copy with Shift set.
    pub const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// A native input event.
#[derive(Clone, Debug, PartialEq)]
pub struct NativeEvent {
    /// Event type.
    pub kind: EventType,
    /// The node the event was dispatched to.
    pub target: NodeId,
    /// For `mouseover`/`mouseout`: the node the pointer moved to (or came from).
    pub related_target: Option<NodeId>,
    /// Pointer position in viewport coordinates.
    pub client: Point,
    /// Button involved in the event.
    pub button: MouseButton,
    /// Modifier keys.
    pub keys: KeyState,
    /// Host timestamp in milliseconds.
    pub time_ms: u64,
    current_target: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl NativeEvent {
    /// A bare event of the given type.
    pub fn new(kind: EventType, target: NodeId) -> Self {
        Self {
            kind,
            target,
            related_target: None,
            client: Point::ZERO,
            button: MouseButton::None,
            keys: KeyState::NONE,
            time_ms: 0,
            current_target: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// A primary-button mouse event at `client`.
    pub fn mouse(kind: EventType, target: NodeId, client: Point) -> Self {
        Self {
            client,
            button: MouseButton::Primary,
            ..Self::new(kind, target)
        }
    }

    /// Sets the button.
    #[must_use]
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    /// Sets the modifier keys.
    #[must_use]
    pub fn with_keys(mut self, keys: KeyState) -> Self {
        self.keys = keys;
        self
    }

    /// Sets the related target.
    #[must_use]
    pub fn with_related_target(mut self, related: NodeId) -> Self {
        self.related_target = Some(related);
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn at(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }

    /// The node whose listeners are currently running, while the event is in flight.
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub(crate) fn set_current_target(&mut self, node: Option<NodeId>) {
        self.current_target = node;
    }

    /// Cancel the default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop delivery to further nodes on the propagation path.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and, unless `allow_default`, cancel the default action.
    pub fn stop(&mut self, allow_default: bool) {
        if !allow_default {
            self.prevent_default();
        }
        self.stop_propagation();
    }

    /// Whether the default action was cancelled.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Whether the event was caused by the primary button.
    pub fn is_left_click(&self) -> bool {
        self.button == MouseButton::Primary
    }

    /// Whether the event was caused by the secondary button.
    pub fn is_right_click(&self) -> bool {
        self.button == MouseButton::Secondary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for kind in [
            EventType::MouseOver,
            EventType::MouseOut,
            EventType::DblRightClick,
            EventType::KeyPress,
            EventType::SelectStart,
        ] {
            assert_eq!(EventType::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(EventType::from_name("wheel"), None);
    }

    #[test]
    fn stop_with_allow_default_only_stops_propagation() {
        let mut ev = NativeEvent::new(EventType::Click, NodeId::new(0, 1));
        ev.stop(true);
        assert!(ev.propagation_stopped());
        assert!(!ev.default_prevented());

        let mut ev = NativeEvent::new(EventType::Click, NodeId::new(0, 1));
        ev.stop(false);
        assert!(ev.propagation_stopped());
        assert!(ev.default_prevented());
    }

    #[test]
    fn button_classification() {
        let node = NodeId::new(0, 1);
        let ev = NativeEvent::mouse(EventType::MouseDown, node, Point::ZERO);
        assert!(ev.is_left_click());
        let ev = ev.with_button(MouseButton::Secondary);
        assert!(!ev.is_left_click());
        assert!(ev.is_right_click());
    }

    #[test]
    fn focus_and_scroll_do_not_bubble() {
        assert!(!EventType::Focus.bubbles());
        assert!(!EventType::Scroll.bubbles());
        assert!(EventType::MouseMove.bubbles());
        assert!(EventType::MouseOut.bubbles());
    }
}

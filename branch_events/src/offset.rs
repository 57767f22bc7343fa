// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cached geometry for translating client coordinates into node coordinates.

use branch_dom::{Document, NodeId};
use kurbo::{Point, Vec2};

/// Offsets sampled from the document the first time a pointer position is
/// computed, reused until [`clear`](Self::clear).
///
/// Nothing here notices layout changes. Callers clear the cache whenever the
/// observed node, its scroll ancestors or the viewport may have moved.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MouseOffsetCache {
    scrolls: Option<Vec2>,
    client_offsets: Option<Vec2>,
    position: Option<Point>,
}

impl MouseOffsetCache {
    /// Drop every cached value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.scrolls.is_none() && self.client_offsets.is_none() && self.position.is_none()
    }

    /// The cached viewport scroll, if sampled.
    pub fn scrolls(&self) -> Option<Vec2> {
        self.scrolls
    }

    /// The cached root client offsets, if sampled.
    pub fn client_offsets(&self) -> Option<Vec2> {
        self.client_offsets
    }

    /// The cached page position of the node (viewport scroll added back), if sampled.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Pointer position of `client` relative to `node`, sampling whatever is
    /// not cached yet.
    pub fn pointer_position(&mut self, doc: &Document, node: NodeId, client: Point) -> Point {
        let scrolls = *self.scrolls.get_or_insert_with(|| doc.viewport_scroll());
        let client_offsets = *self.client_offsets.get_or_insert_with(|| doc.client_offset());
        let position = *self
            .position
            .get_or_insert_with(|| doc.page_position(node) + scrolls);
        (client + scrolls) - position.to_vec2() - client_offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branch_dom::Element;
    use kurbo::Size;

    #[test]
    fn position_is_relative_to_node_and_survives_until_cleared() {
        let doc = Document::new();
        let div = doc
            .append(doc.body(), Element::at(Vec2::new(40.0, 20.0), Size::new(100.0, 100.0)))
            .unwrap();
        let mut cache = MouseOffsetCache::default();
        assert!(cache.is_empty());

        let p = cache.pointer_position(&doc, div, Point::new(50.0, 25.0));
        assert_eq!(p, Point::new(10.0, 5.0));
        assert!(!cache.is_empty());

        // Stale until cleared.
        doc.update(div, |el| el.offset = Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(cache.pointer_position(&doc, div, Point::new(50.0, 25.0)), Point::new(10.0, 5.0));

        cache.clear();
        assert_eq!(cache.pointer_position(&doc, div, Point::new(50.0, 25.0)), Point::new(50.0, 25.0));
    }

    #[test]
    fn viewport_scroll_cancels_out_for_client_coordinates() {
        let doc = Document::new();
        let div = doc
            .append(doc.body(), Element::at(Vec2::new(40.0, 20.0), Size::new(100.0, 100.0)))
            .unwrap();
        doc.set_viewport_scroll(Vec2::new(0.0, 15.0));
        doc.set_client_offset(Vec2::new(2.0, 2.0));

        let mut cache = MouseOffsetCache::default();
        // The node sits at y = 5 in the viewport once scrolled.
        let p = cache.pointer_position(&doc, div, Point::new(50.0, 10.0));
        assert_eq!(p, Point::new(8.0, 3.0));
        assert_eq!(cache.scrolls(), Some(Vec2::new(0.0, 15.0)));
        assert_eq!(cache.position(), Some(Point::new(40.0, 20.0)));
    }
}

// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use branch_dom::KeyState;

bitflags::bitflags! {
    /// Modifier-key combination a handler responds to.
    ///
    /// Matching is exact: a handler masked with [`KeyMask::SHIFT`] ignores
    /// Shift+Ctrl even though Shift is held.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyMask: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Alt.
        const ALT   = 0b0000_0100;
    }
}

impl KeyMask {
    /// No modifiers held.
    pub const NONE: Self = Self::empty();

    /// The mask of the modifiers held in `keys`.
    pub fn from_keys(keys: KeyState) -> Self {
        let mut mask = Self::NONE;
        mask.set(Self::SHIFT, keys.shift);
        mask.set(Self::CTRL, keys.ctrl);
        mask.set(Self::ALT, keys.alt);
        mask
    }

    /// Whether `keys` is exactly this combination.
    pub fn matches(self, keys: KeyState) -> bool {
        Self::from_keys(keys) == self
    }
}

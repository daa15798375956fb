//! Small state and input enums shared by the lifecycle manager and the engine.
//!
//! # State Machine
//!
//! The menu is either [`OpenState::Closed`] (initial) or [`OpenState::Open`]:
//!
//! ```text
//! Closed --open()--> Open
//! Open  --close()--> Closed
//! ```
//!
//! `toggle()` dispatches to whichever transition applies. There is no terminal
//! state.

/// Visibility of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenState {
    /// Menu hidden. Search text and highlight are at their initial values.
    #[default]
    Closed,

    /// Menu visible and accepting search input and navigation keys.
    Open,
}

impl OpenState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Navigation keys understood by the control.
///
/// The host maps its native key events onto these. Printable characters typed
/// into the search field arrive as [`crate::Event::SearchInput`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Confirm: opens the menu, or selects the highlighted option.
    Enter,
    /// Confirm, same as `Enter`.
    Space,
    /// Cancel: closes the menu without touching the selected value.
    Escape,
    /// Move next, wrapping from the last option to the first.
    ArrowDown,
    /// Move previous, wrapping from the first option to the last.
    ArrowUp,
    /// Jump to the first option.
    Home,
    /// Jump to the last option.
    End,
}

/// Where a scrolled-to option should land in the menu's scroll region.
///
/// Mirrors the `block` option of the DOM's `scrollIntoView`; the control only
/// ever asks for the nearest edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBlock {
    /// Scroll the minimum distance that brings the option fully into view.
    #[default]
    Nearest,
}

/// How the host should animate a scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Animated scrolling.
    #[default]
    Smooth,
}

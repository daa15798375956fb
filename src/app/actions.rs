//! Actions representing side effects the host executes after an event.
//!
//! The event handler returns a `Vec<Action>` next to its re-render flag. Actions
//! cover what a headless control cannot do itself: moving input focus and
//! scrolling the host's menu. Selection is reported through the `on_change`
//! callback, not through an action.
//!
//! # Example
//!
//! ```rust
//! use dropsearch::{Action, ScrollBehavior, ScrollBlock};
//! use std::time::Duration;
//!
//! let actions = vec![
//!     Action::FocusSearch { delay: Duration::from_millis(100) },
//!     Action::ScrollIntoView { index: 3, block: ScrollBlock::Nearest, behavior: ScrollBehavior::Smooth },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use super::modes::{ScrollBehavior, ScrollBlock};
use std::time::Duration;

/// Commands the host runtime executes on the control's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move keyboard focus into the search field once `delay` has elapsed.
    ///
    /// Emitted when the menu opens; the delay lets the menu render first.
    FocusSearch {
        /// How long to wait before focusing.
        delay: Duration,
    },

    /// Scroll the option at `index` (into Filtered Options) into view.
    ///
    /// Emitted whenever keyboard navigation moves the highlight. Purely visual.
    ScrollIntoView {
        /// Position within the currently shown options.
        index: usize,
        /// Target alignment within the scroll region.
        block: ScrollBlock,
        /// Scroll animation.
        behavior: ScrollBehavior,
    },
}

impl Action {
    /// Scroll action using the nearest-edge, smooth-motion policy.
    #[must_use]
    pub const fn scroll_to(index: usize) -> Self {
        Self::ScrollIntoView {
            index,
            block: ScrollBlock::Nearest,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

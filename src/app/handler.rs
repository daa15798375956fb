//! Event handling and state transition logic.
//!
//! This module translates discrete host events (clicks, key presses, pointer
//! movement, search input, lookup completions) into [`Dropdown`] state changes
//! and the side effects the host must carry out.
//!
//! # Architecture
//!
//! ```text
//! Host Input → Event → handle_event → Dropdown mutations → (re-render?, Actions)
//!                 ↑                                              │
//!                 └──── LookupCompleted ← poll_lookup ←──────────┘
//! ```
//!
//! Handling never fails. Events that do not apply in the current state (a key
//! press on a disabled control, a click on an index that no longer exists) are
//! ignored and reported as "no re-render".
//!
//! # Example
//!
//! ```rust
//! use dropsearch::{handle_event, Action, Dropdown, Event, Key, OptionItem};
//!
//! let mut dropdown = Dropdown::new(vec![OptionItem::from("Kyiv"), OptionItem::from("Lviv")]);
//! let (render, actions) = handle_event(&mut dropdown, Event::Key(Key::ArrowDown));
//! assert!(render);
//! assert!(matches!(actions[0], Action::FocusSearch { .. }));
//! assert_eq!(dropdown.highlighted_index(), Some(0));
//! ```

use super::actions::Action;
use super::modes::Key;
use super::state::Dropdown;
use crate::domain::{Boundary, Point, Selectable};
use crate::lookup::LookupCompletion;

/// Events delivered to the control by its host.
#[derive(Debug)]
pub enum Event<T> {
    /// Click on the trigger: toggles the menu.
    TriggerClick,
    /// Navigation or confirmation key.
    Key(Key),
    /// New content of the search field.
    SearchInput(String),
    /// Click on the option at this index of the filtered options.
    OptionClick(usize),
    /// Pointer entered the option at this index.
    PointerEnter(usize),
    /// Global pointer-down, forwarded while the outside listener is active.
    PointerDown(Point),
    /// Where the trigger and menu are currently rendered.
    ///
    /// Until the first layout arrives, `PointerDown` never closes the menu:
    /// with no measured rects there is no way to tell inside from outside.
    Layout(Boundary),
    /// Host replaced the option list.
    SetOptions(Vec<T>),
    /// Host changed the selected value.
    SetValue(Option<T>),
    /// Host changed the disabled flag.
    SetDisabled(bool),
    /// An asynchronous lookup resolved.
    LookupCompleted(LookupCompletion<T>),
    /// The host is unmounting the control.
    Teardown,
}

impl<T> Event<T> {
    /// Short name used in tracing spans.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TriggerClick => "trigger_click",
            Self::Key(_) => "key",
            Self::SearchInput(_) => "search_input",
            Self::OptionClick(_) => "option_click",
            Self::PointerEnter(_) => "pointer_enter",
            Self::PointerDown(_) => "pointer_down",
            Self::Layout(_) => "layout",
            Self::SetOptions(_) => "set_options",
            Self::SetValue(_) => "set_value",
            Self::SetDisabled(_) => "set_disabled",
            Self::LookupCompleted(_) => "lookup_completed",
            Self::Teardown => "teardown",
        }
    }
}

/// Processes an event, mutates the dropdown, and returns what the host should do.
///
/// # Returns
///
/// A tuple of `(re-render, actions)`. `re-render` is `true` when the visible
/// state changed. Actions are returned in execution order.
pub fn handle_event<T: Selectable + 'static>(
    state: &mut Dropdown<T>,
    event: Event<T>,
) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = event.kind()).entered();

    match event {
        Event::TriggerClick => {
            if state.is_disabled() {
                tracing::debug!("trigger click ignored, control disabled");
                return (false, vec![]);
            }
            let was_open = state.is_open();
            if !state.toggle() {
                return (false, vec![]);
            }
            let actions = if was_open {
                vec![]
            } else {
                vec![focus_search(state)]
            };
            (true, actions)
        }
        Event::Key(key) => handle_key(state, key),
        Event::SearchInput(text) => (state.set_search_text(&text), vec![]),
        Event::OptionClick(index) => (state.commit(index).is_some(), vec![]),
        Event::PointerEnter(index) => (state.hover(index), vec![]),
        Event::PointerDown(position) => (state.pointer_down(position), vec![]),
        Event::Layout(boundary) => {
            state.lifecycle_mut().set_boundary(boundary);
            (false, vec![])
        }
        Event::SetOptions(options) => {
            tracing::debug!(count = options.len(), "options replaced");
            state.set_options(options);
            (true, vec![])
        }
        Event::SetValue(value) => {
            state.set_value(value);
            (true, vec![])
        }
        Event::SetDisabled(disabled) => {
            if state.is_disabled() == disabled {
                return (false, vec![]);
            }
            state.set_disabled(disabled);
            (true, vec![])
        }
        Event::LookupCompleted(completion) => {
            let awaiting = state.awaiting_first_highlight();
            if !state.apply_lookup_completion(completion) {
                return (false, vec![]);
            }
            let actions = match state.highlighted_index() {
                Some(index) if awaiting => vec![Action::scroll_to(index)],
                _ => vec![],
            };
            (true, actions)
        }
        Event::Teardown => {
            state.teardown();
            (true, vec![])
        }
    }
}

fn handle_key<T: Selectable + 'static>(state: &mut Dropdown<T>, key: Key) -> (bool, Vec<Action>) {
    if state.is_disabled() {
        tracing::debug!(?key, "key ignored, control disabled");
        return (false, vec![]);
    }

    match key {
        Key::Enter | Key::Space => {
            if !state.is_open() {
                return open_with_focus(state);
            }
            if state.commit_highlighted().is_none() {
                state.close();
            }
            (true, vec![])
        }
        Key::Escape => (state.close(), vec![]),
        Key::ArrowDown => {
            if !state.is_open() {
                let (render, mut actions) = open_with_focus(state);
                if let Some(index) = state.highlight_first_when_ready() {
                    actions.push(Action::scroll_to(index));
                }
                return (render, actions);
            }
            navigated(state.move_highlight_next())
        }
        Key::ArrowUp => navigated(state.move_highlight_prev()),
        Key::Home => navigated(state.highlight_first()),
        Key::End => navigated(state.highlight_last()),
    }
}

fn open_with_focus<T: Selectable + 'static>(state: &mut Dropdown<T>) -> (bool, Vec<Action>) {
    if state.open() {
        (true, vec![focus_search(state)])
    } else {
        (false, vec![])
    }
}

fn focus_search<T: Selectable + 'static>(state: &Dropdown<T>) -> Action {
    Action::FocusSearch {
        delay: state.focus_delay(),
    }
}

fn navigated(index: Option<usize>) -> (bool, Vec<Action>) {
    index.map_or_else(|| (false, vec![]), |index| (true, vec![Action::scroll_to(index)]))
}

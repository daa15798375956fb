//! Selection and filtering engine.
//!
//! [`Dropdown`] is the single source of truth for one control instance: the
//! host-supplied options and selected value, the search text, the derived
//! filtered options, the loading flag and the keyboard highlight. It is mutated
//! by [`crate::app::handler::handle_event`] and read by the view model.
//!
//! # State Components
//!
//! - **Options**: Source list, replaced wholesale by the host
//! - **Value**: Host-owned selection, only read for display and comparison
//! - **Search Text**: Owned here, reset whenever the menu closes
//! - **Filtered Options**: Derived from search text and options (or a lookup)
//! - **Loading**: True while the latest lookup is still in flight
//! - **Highlight**: Index into filtered options, reset whenever they are replaced
//!
//! # Example
//!
//! ```rust
//! use dropsearch::{Dropdown, OptionItem};
//!
//! let options: Vec<OptionItem> = vec!["Kyiv".into(), "Kharkiv".into(), "Odesa".into()];
//! let mut dropdown = Dropdown::new(options);
//! dropdown.open();
//! dropdown.set_search_text("kh");
//! assert_eq!(dropdown.filtered_options(), &[OptionItem::from("Kharkiv")]);
//! ```

use super::lifecycle::{Lifecycle, PointerHub};
use super::modes::OpenState;
use crate::domain::{contains_ignore_case, Point, Selectable};
use crate::lookup::{LookupCompletion, LookupOutcome, LookupQueue, SearchFunction};
use crate::Config;
use std::fmt;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Host callback invoked with the chosen option on selection commit.
pub type ChangeCallback<T> = Box<dyn FnMut(&T)>;

/// Host renderer turning an option into display text.
pub type Renderer<T> = Box<dyn Fn(&T) -> String>;

/// State of one searchable dropdown over options of type `T`.
///
/// While a lookup is loading the menu shows only the loading text, so
/// navigation, hover and commit are inert until the result arrives.
pub struct Dropdown<T> {
    /// Open/closed state and the outside-click subscription.
    lifecycle: Lifecycle,

    /// Source options as supplied by the host.
    options: Vec<T>,

    /// Host-owned selection.
    value: Option<T>,

    /// Current search field content. Empty whenever the menu is closed.
    search_text: String,

    /// Options currently eligible for display.
    ///
    /// Keeps its previous content while a lookup is in flight.
    filtered: Vec<T>,

    /// True while the latest lookup has not resolved.
    loading: bool,

    /// Keyboard/hover highlight into `filtered`.
    highlighted: Option<usize>,

    /// Set by an ArrowDown-open that found nothing to highlight yet.
    highlight_first_pending: bool,

    /// Gate on all interaction.
    disabled: bool,

    /// Tags and futures of issued lookups.
    lookups: LookupQueue<T>,

    /// Replaces the default substring filter when present.
    search_function: Option<Box<dyn SearchFunction<T>>>,

    /// Formats each listed option.
    render_option: Option<Renderer<T>>,

    /// Formats the selection on the trigger.
    render_selected: Option<Renderer<T>>,

    /// Receives the committed option.
    on_change: Option<ChangeCallback<T>>,

    /// Texts, accessible name and focus delay.
    config: Config,
}

impl<T: Selectable + 'static> Dropdown<T> {
    /// Creates a closed dropdown over `options` with default configuration.
    #[must_use]
    pub fn new(options: Vec<T>) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            filtered: options.clone(),
            options,
            value: None,
            search_text: String::new(),
            loading: false,
            highlighted: None,
            highlight_first_pending: false,
            disabled: false,
            lookups: LookupQueue::new(),
            search_function: None,
            render_option: None,
            render_selected: None,
            on_change: None,
            config: Config::default(),
        }
    }

    /// Applies texts, accessible name and the disabled flag from `config`.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.disabled = config.disabled;
        self.config = config;
        self
    }

    /// Sets the initially selected value.
    #[must_use]
    pub fn with_value(mut self, value: Option<T>) -> Self {
        self.value = value;
        self
    }

    /// Replaces the default substring filter with `lookup`.
    #[must_use]
    pub fn with_search_function(mut self, lookup: impl SearchFunction<T> + 'static) -> Self {
        self.search_function = Some(Box::new(lookup));
        self
    }

    /// Formats each listed option with `render` instead of its display text.
    #[must_use]
    pub fn with_render_option(mut self, render: impl Fn(&T) -> String + 'static) -> Self {
        self.render_option = Some(Box::new(render));
        self
    }

    /// Formats the selected value on the trigger with `render`.
    #[must_use]
    pub fn with_render_selected(mut self, render: impl Fn(&T) -> String + 'static) -> Self {
        self.render_selected = Some(Box::new(render));
        self
    }

    /// Registers the callback receiving each committed option.
    #[must_use]
    pub fn with_on_change(mut self, on_change: impl FnMut(&T) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Registers a hook run each time the menu transitions to closed.
    #[must_use]
    pub fn with_on_close(mut self, on_close: impl FnMut() + 'static) -> Self {
        self.lifecycle = std::mem::take(&mut self.lifecycle).with_close_hook(Box::new(on_close));
        self
    }

    /// Subscribes to `hub` for outside-click detection while open.
    #[must_use]
    pub fn with_pointer_hub(mut self, hub: Rc<dyn PointerHub>) -> Self {
        self.lifecycle = std::mem::take(&mut self.lifecycle).with_hub(hub);
        self
    }

    /// Current menu visibility.
    #[must_use]
    pub const fn open_state(&self) -> OpenState {
        self.lifecycle.state()
    }

    /// Whether the menu is visible.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }

    /// Read access to the open/close machine, e.g. for its listener id.
    #[must_use]
    pub const fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub(crate) fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    /// Source options as supplied by the host.
    #[must_use]
    pub fn options(&self) -> &[T] {
        &self.options
    }

    /// The host-owned selection, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Current search field content.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Options eligible for display; the previous list while loading.
    #[must_use]
    pub fn filtered_options(&self) -> &[T] {
        &self.filtered
    }

    /// Whether the latest lookup is still in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Index of the highlighted option in the filtered options.
    #[must_use]
    pub const fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    /// The highlighted option itself.
    #[must_use]
    pub fn highlighted_option(&self) -> Option<&T> {
        self.highlighted.and_then(|i| self.filtered.get(i))
    }

    /// Whether an ArrowDown-open is still waiting for options to highlight.
    #[must_use]
    pub const fn awaiting_first_highlight(&self) -> bool {
        self.highlight_first_pending
    }

    /// Whether interaction is switched off.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Delay before the search field should receive focus after opening.
    #[must_use]
    pub const fn focus_delay(&self) -> Duration {
        Duration::from_millis(self.config.focus_delay_ms)
    }

    /// Number of lookups whose futures have not resolved yet.
    #[must_use]
    pub fn lookups_in_flight(&self) -> usize {
        self.lookups.in_flight()
    }

    /// Opens the menu with a fresh highlight. Returns `false` if disabled or already open.
    pub fn open(&mut self) -> bool {
        if self.disabled || !self.lifecycle.open() {
            return false;
        }
        self.highlighted = None;
        self.highlight_first_pending = false;
        true
    }

    /// Closes the menu and resets search text and highlight. Idempotent.
    pub fn close(&mut self) -> bool {
        if !self.lifecycle.close() {
            return false;
        }
        self.reset_interaction();
        true
    }

    /// Closes if open, opens if closed. Returns `false` when nothing changed.
    pub fn toggle(&mut self) -> bool {
        if self.disabled {
            tracing::debug!("toggle ignored, control disabled");
            return false;
        }
        if self.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    /// Handles a global pointer-down; closes the menu if it landed outside.
    pub fn pointer_down(&mut self, position: Point) -> bool {
        if !self.lifecycle.pointer_down(position) {
            return false;
        }
        self.reset_interaction();
        true
    }

    /// Returns the control to its initial closed state and releases the
    /// outside-click subscription, without running the close hook.
    pub fn teardown(&mut self) {
        self.lifecycle.teardown();
        self.reset_interaction();
    }

    fn reset_interaction(&mut self) {
        self.highlight_first_pending = false;
        if self.search_text.is_empty() {
            self.highlighted = None;
        } else {
            self.search_text.clear();
            self.apply_search_filter();
        }
    }

    /// Sets the search text and recomputes filtered options.
    ///
    /// Ignored while the menu is closed. Returns `false` if nothing changed.
    pub fn set_search_text(&mut self, text: &str) -> bool {
        if !self.is_open() {
            tracing::debug!("search input ignored, menu closed");
            return false;
        }
        if self.search_text == text {
            return false;
        }
        self.search_text = text.to_string();
        tracing::trace!(query = %self.search_text, "search text updated");
        self.apply_search_filter();
        true
    }

    /// Replaces the source options and recomputes filtered options.
    pub fn set_options(&mut self, options: Vec<T>) {
        self.options = options;
        self.apply_search_filter();
    }

    /// Replaces the selection. Only the host calls this; commits do not.
    pub fn set_value(&mut self, value: Option<T>) {
        self.value = value;
    }

    /// Disabling an open control closes it.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.close();
        }
    }

    /// Recomputes filtered options from the current search text.
    ///
    /// # Filtering Algorithm
    ///
    /// 1. **Empty search**: show every option, clear loading, supersede lookups
    /// 2. **Lookup supplied**: apply a ready result at once, or track the future
    ///    under a fresh request tag and set loading (previous results stay shown)
    /// 3. **Default**: keep options whose display text contains the search text,
    ///    ignoring case
    ///
    /// The highlight is reset in every branch.
    pub fn apply_search_filter(&mut self) {
        let _span = tracing::debug_span!(
            "apply_search_filter",
            total_options = self.options.len(),
            query_len = self.search_text.len(),
            has_lookup = self.search_function.is_some()
        )
        .entered();

        self.highlighted = None;

        if self.search_text.is_empty() {
            self.lookups.supersede();
            self.loading = false;
            let all = self.options.clone();
            self.replace_filtered(all);
            return;
        }

        let outcome = self
            .search_function
            .as_ref()
            .map(|lookup| lookup.search(&self.search_text, &self.options));

        match outcome {
            Some(LookupOutcome::Ready(result)) => {
                self.lookups.supersede();
                self.loading = false;
                self.apply_lookup_result(result);
            }
            Some(LookupOutcome::Pending(future)) => {
                let request = self.lookups.issue(&self.search_text);
                tracing::debug!(seq = request.seq, query = %request.query, "lookup issued");
                self.lookups.track(request, future);
                self.loading = true;
            }
            None => {
                let matched = self
                    .options
                    .iter()
                    .filter(|option| contains_ignore_case(&option.display_text(), &self.search_text))
                    .cloned()
                    .collect();
                self.replace_filtered(matched);
            }
        }

        tracing::debug!(
            filtered_count = self.filtered.len(),
            loading = self.loading,
            "search filter applied"
        );
    }

    /// Applies a finished lookup if it is still current. Returns whether it was applied.
    pub fn apply_lookup_completion(&mut self, completion: LookupCompletion<T>) -> bool {
        let LookupCompletion { request, result } = completion;
        let _span = tracing::debug_span!("apply_lookup_completion", seq = request.seq, query = %request.query).entered();

        if !self.lookups.is_current(&request, &self.search_text) {
            tracing::debug!(
                seq = request.seq,
                query = %request.query,
                current_query = %self.search_text,
                "discarding stale lookup result"
            );
            return false;
        }

        self.lookups.supersede();
        self.loading = false;
        self.apply_lookup_result(result);
        true
    }

    fn apply_lookup_result(&mut self, result: crate::Result<Vec<T>>) {
        match result {
            Ok(options) => self.replace_filtered(options),
            Err(e) => {
                tracing::error!(query = %self.search_text, error = %e, "search lookup failed");
                self.replace_filtered(Vec::new());
            }
        }
    }

    fn replace_filtered(&mut self, options: Vec<T>) {
        self.filtered = options;
        self.highlighted = None;
        if self.highlight_first_pending && !self.filtered.is_empty() {
            self.highlight_first_pending = false;
            self.highlighted = Some(0);
        }
    }

    /// Highlights the first option now, or as soon as a non-empty list arrives.
    ///
    /// Returns the index highlighted immediately, if any.
    pub fn highlight_first_when_ready(&mut self) -> Option<usize> {
        if self.loading || self.filtered.is_empty() {
            self.highlight_first_pending = true;
            return None;
        }
        self.highlighted = Some(0);
        self.highlighted
    }

    /// Advances the highlight, wrapping from the last option to the first.
    pub fn move_highlight_next(&mut self) -> Option<usize> {
        let len = self.navigable_len()?;
        let next = self.highlighted.map_or(0, |i| (i + 1) % len);
        self.highlighted = Some(next);
        self.highlighted
    }

    /// Moves the highlight back, wrapping from the first option (or none) to the last.
    pub fn move_highlight_prev(&mut self) -> Option<usize> {
        let len = self.navigable_len()?;
        let prev = match self.highlighted {
            None | Some(0) => len - 1,
            Some(i) => i - 1,
        };
        self.highlighted = Some(prev);
        self.highlighted
    }

    /// Jumps the highlight to the first option.
    pub fn highlight_first(&mut self) -> Option<usize> {
        self.navigable_len()?;
        self.highlighted = Some(0);
        self.highlighted
    }

    /// Jumps the highlight to the last option.
    pub fn highlight_last(&mut self) -> Option<usize> {
        let len = self.navigable_len()?;
        self.highlighted = Some(len - 1);
        self.highlighted
    }

    /// Hover-highlights the option at `index`. Returns `false` if out of range or closed.
    pub fn hover(&mut self, index: usize) -> bool {
        if self.navigable_len().is_none() || index >= self.filtered.len() || self.highlighted == Some(index) {
            return false;
        }
        self.highlighted = Some(index);
        true
    }

    fn navigable_len(&self) -> Option<usize> {
        if !self.is_open() || self.loading || self.filtered.is_empty() {
            return None;
        }
        Some(self.filtered.len())
    }

    /// Commits the option at `index` of the filtered options.
    ///
    /// Invokes the change callback, then closes the menu. Returns the committed
    /// option, or `None` if the menu is closed, a lookup is loading, or `index`
    /// is out of range.
    pub fn commit(&mut self, index: usize) -> Option<T> {
        if !self.is_open() {
            return None;
        }
        if self.loading {
            tracing::debug!(index, "commit ignored, lookup in flight");
            return None;
        }
        let Some(option) = self.filtered.get(index).cloned() else {
            tracing::debug!(index, filtered_count = self.filtered.len(), "commit index out of range");
            return None;
        };

        tracing::debug!(index, key = ?option.identity_key(), "option selected");
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&option);
        }
        self.close();
        Some(option)
    }

    /// Commits the highlighted option, if there is one.
    pub fn commit_highlighted(&mut self) -> Option<T> {
        let index = self.highlighted?;
        self.commit(index)
    }

    /// Text shown on the trigger: the placeholder, or the formatted selection.
    #[must_use]
    pub fn display_value(&self) -> String {
        match (&self.value, &self.render_selected) {
            (None, _) => self.config.placeholder.clone(),
            (Some(value), Some(render)) => render(value),
            (Some(value), None) => value.display_text().into_owned(),
        }
    }

    /// Text shown for `option` in the list.
    #[must_use]
    pub fn option_display(&self, option: &T) -> String {
        self.render_option
            .as_ref()
            .map_or_else(|| option.display_text().into_owned(), |render| render(option))
    }

    /// Whether `option` is the current selection.
    #[must_use]
    pub fn is_selected(&self, option: &T) -> bool {
        self.value.as_ref().is_some_and(|value| value.same_selection(option))
    }

    /// Polls in-flight lookups for the next completion.
    ///
    /// Feed the result back through [`crate::Event::LookupCompleted`].
    pub fn poll_lookup(&mut self, cx: &mut Context<'_>) -> Poll<Option<LookupCompletion<T>>> {
        self.lookups.poll_next(cx)
    }

    /// Waits for the next lookup completion; `None` when nothing is in flight.
    pub async fn next_lookup(&mut self) -> Option<LookupCompletion<T>> {
        self.lookups.next().await
    }
}

impl<T> fmt::Debug for Dropdown<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dropdown")
            .field("lifecycle", &self.lifecycle)
            .field("options", &self.options.len())
            .field("has_value", &self.value.is_some())
            .field("search_text", &self.search_text)
            .field("filtered", &self.filtered.len())
            .field("loading", &self.loading)
            .field("highlighted", &self.highlighted)
            .field("disabled", &self.disabled)
            .field("lookups", &self.lookups)
            .finish_non_exhaustive()
    }
}

//! Dropsearch: a headless, searchable, keyboard-navigable selection dropdown.
//!
//! The crate implements the behaviour of a single-select combobox without
//! drawing anything:
//! - A trigger showing the current selection or a placeholder
//! - A menu with a search field and a filtered option list
//! - Substring filtering by default, or caller-supplied lookups that may be
//!   synchronous or asynchronous, with stale results discarded
//! - Keyboard navigation with wrap-around and scroll-into-view requests
//! - Outside-click dismissal tied to an RAII listener subscription

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (DOM bridge, TUI, test harness)               │  ← Input + rendering
//! └─────────────────────────────────────────────────────┘
//!                        │ Event            ▲ (bool, Vec<Action>), DropdownView
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling                                   │
//! │  - Open/close lifecycle + outside-click listener    │
//! │  - Selection & filtering engine                     │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Lookup Layer  │   │ Domain Layer  │
//! │ (ui/)         │   │ (lookup/)     │   │ (domain/)     │
//! │ - View models │   │ - Sync/async  │   │ - Options     │
//! │ - Match ranges│   │ - Stale guard │   │ - Geometry    │
//! │               │   │ - Fuzzy rank  │   │ - Errors      │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - tracing subscriber setup                         │
//! │  - JSON-lines OpenTelemetry span export             │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Dropdown state machine with event/action model
//! - [`domain`]: Option model, geometry and errors
//! - [`lookup`]: Search functions and lookup sequencing
//! - [`ui`]: View model computation
//! - [`observability`]: Tracing initialization
//!
//! # Configuration
//!
//! Text and behaviour knobs live in [`Config`]. Hosts pass string attributes
//! through [`Config::from_map`] or keep them in a TOML file:
//!
//! ```toml
//! placeholder = "Pick a city"
//! search_placeholder = "Type to filter"
//! name = "city"
//! focus_delay_ms = 50
//! trace_level = "dropsearch=debug"
//! ```
//!
//! # Example
//!
//! ```rust
//! use dropsearch::{handle_event, Action, Dropdown, Event, Key, OptionItem};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let options = vec![
//!     OptionItem::from("Kyiv"),
//!     OptionItem::from("Lviv"),
//!     OptionItem::from("Odesa"),
//! ];
//! let chosen = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&chosen);
//! let mut dropdown = Dropdown::new(options).with_on_change(move |o: &OptionItem| {
//!     *sink.borrow_mut() = Some(o.clone());
//! });
//!
//! let (_, actions) = handle_event(&mut dropdown, Event::TriggerClick);
//! assert!(matches!(actions[0], Action::FocusSearch { .. }));
//!
//! handle_event(&mut dropdown, Event::SearchInput("lv".to_string()));
//! assert_eq!(dropdown.filtered_options().len(), 1);
//!
//! handle_event(&mut dropdown, Event::Key(Key::ArrowDown));
//! handle_event(&mut dropdown, Event::Key(Key::Enter));
//! assert!(!dropdown.is_open());
//!
//! // The host owns the value and feeds the choice back.
//! let choice = chosen.borrow_mut().take();
//! handle_event(&mut dropdown, Event::SetValue(choice));
//! assert_eq!(dropdown.display_value(), "Lviv");
//! ```
//!
//! # Key Design Decisions
//!
//! ## Event Handling Never Fails
//!
//! Events that do not apply in the current state (an out-of-range index, a
//! key while disabled) are ignored and logged at debug level. Only
//! construction-time helpers return [`Result`].
//!
//! ## Lookups Are Tagged
//!
//! Every asynchronous lookup carries a sequence number and the search text
//! that produced it. A completion is applied only while it is still the
//! latest request for the current text.
//!
//! ## Identity Selection
//!
//! Record options compare by shared identity, not by field contents, so two
//! records with equal fields are still different choices.

pub mod app;
pub mod domain;
pub mod lookup;
pub mod observability;
pub mod ui;

pub use app::{handle_event, Action, Dropdown, Event, Key, OpenState, ScrollBehavior, ScrollBlock};
pub use domain::{Boundary, DropdownError, OptionItem, Point, Rect, Record, Result, Selectable};
pub use lookup::{async_lookup, sync_lookup, FuzzyLookup, LookupCompletion, LookupOutcome, SearchFunction};
pub use ui::DropdownView;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_FOCUS_DELAY_MS: u64 = 100;

/// Dropdown configuration: display texts, accessibility and tracing.
///
/// Every field has a default, so a TOML document only needs the keys it
/// changes.
///
/// # Example
///
/// ```rust
/// use dropsearch::Config;
///
/// let config = Config::from_toml_str(r#"placeholder = "Pick a city""#)?;
/// assert_eq!(config.placeholder, "Pick a city");
/// assert_eq!(config.focus_delay_ms, 100);
/// # Ok::<(), dropsearch::DropdownError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trigger text while nothing is selected. Default: `"Select an option"`
    pub placeholder: String,

    /// Placeholder of the search field. Default: `"Search..."`
    pub search_placeholder: String,

    /// Shown while an asynchronous lookup is in flight. Default: `"Loading..."`
    pub loading_text: String,

    /// Shown when a non-empty search matched nothing. Default: `"No results"`
    pub no_results_text: String,

    /// Shown when there is nothing to list at all. Default: `"No options"`
    pub no_options_text: String,

    /// Accessible name of the control.
    pub name: Option<String>,

    /// Starts the control disabled.
    pub disabled: bool,

    /// Delay before the search field receives focus after opening.
    ///
    /// Default: `100`
    pub focus_delay_ms: u64,

    /// `EnvFilter` directive for [`observability::init_tracing`].
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any directive
    /// such as `dropsearch=debug`. Default: `"info"`
    pub trace_level: Option<String>,

    /// File receiving JSON-lines span export. Unset means stderr logging.
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            placeholder: "Select an option".to_string(),
            search_placeholder: "Search...".to_string(),
            loading_text: "Loading...".to_string(),
            no_results_text: "No results".to_string(),
            no_options_text: "No options".to_string(),
            name: None,
            disabled: false,
            focus_delay_ms: DEFAULT_FOCUS_DELAY_MS,
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Builds a configuration from string attributes supplied by a host.
    ///
    /// Parsing is lenient: unknown keys are ignored and unparsable values fall
    /// back to defaults.
    ///
    /// # Parsing Rules
    ///
    /// - Text keys (`placeholder`, `search_placeholder`, `loading_text`,
    ///   `no_results_text`, `no_options_text`) are taken as-is
    /// - `name`, `trace_level`, `trace_file`: empty values count as unset
    /// - `disabled`: present with `""`, `"true"`, `"1"` or `"disabled"` means true
    /// - `focus_delay_ms`: String → `u64` (falls back to 100 on parse error)
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use dropsearch::Config;
    ///
    /// let mut attrs = BTreeMap::new();
    /// attrs.insert("placeholder".to_string(), "Pick a city".to_string());
    /// attrs.insert("disabled".to_string(), String::new());
    /// attrs.insert("focus_delay_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&attrs);
    /// assert_eq!(config.placeholder, "Pick a city");
    /// assert!(config.disabled);
    /// assert_eq!(config.focus_delay_ms, 100);
    /// ```
    #[must_use]
    pub fn from_map(attrs: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| attrs.get(key).cloned().unwrap_or(default);
        let optional = |key: &str| {
            attrs
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let disabled = attrs
            .get("disabled")
            .is_some_and(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "" | "true" | "1" | "disabled"));

        let focus_delay_ms = attrs
            .get("focus_delay_ms")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_FOCUS_DELAY_MS);

        Self {
            placeholder: text("placeholder", defaults.placeholder),
            search_placeholder: text("search_placeholder", defaults.search_placeholder),
            loading_text: text("loading_text", defaults.loading_text),
            no_results_text: text("no_results_text", defaults.no_results_text),
            no_options_text: text("no_options_text", defaults.no_options_text),
            name: optional("name"),
            disabled,
            focus_delay_ms,
            trace_level: optional("trace_level"),
            trace_file: optional("trace_file").map(PathBuf::from),
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`DropdownError::Config`] if the document is malformed or a key
    /// has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`DropdownError::Io`] if the file cannot be read and
    /// [`DropdownError::Config`] if its contents are invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded dropdown configuration");
        Ok(config)
    }
}

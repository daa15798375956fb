//! View model types representing renderable dropdown state.
//!
//! View models are computed from a [`Dropdown`] snapshot and carry only
//! display-ready data: texts, keys, selection and highlight flags, and match
//! ranges. They serialize to JSON for hosts that render outside Rust.
//!
//! # Example
//!
//! ```rust
//! use dropsearch::{Dropdown, OptionItem};
//! use dropsearch::ui::MenuBody;
//!
//! let mut dropdown = Dropdown::new(vec![OptionItem::from("Kyiv"), OptionItem::from("Odesa")]);
//! assert!(dropdown.view().menu.is_none());
//!
//! dropdown.open();
//! dropdown.set_search_text("ky");
//! let view = dropdown.view();
//! let Some(MenuBody::Options(items)) = view.menu.map(|menu| menu.body) else {
//!     panic!("expected options");
//! };
//! assert_eq!(items[0].text, "Kyiv");
//! assert_eq!(items[0].match_ranges, vec![(0, 2)]);
//! ```

use crate::app::Dropdown;
use crate::domain::{option_key, Selectable};
use crate::lookup::highlight_ranges;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;

/// Complete view of one dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownView {
    pub trigger: TriggerView,

    /// Present only while the menu is open.
    pub menu: Option<MenuView>,
}

/// The always-visible trigger showing the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerView {
    /// Formatted selection, or the placeholder.
    pub text: String,

    /// Whether `text` is the placeholder.
    pub is_placeholder: bool,

    /// Mirrors the open state (for `aria-expanded`).
    pub expanded: bool,

    pub disabled: bool,

    /// `0` when focusable, `-1` when disabled.
    pub tab_index: i32,

    /// Accessible name of the control.
    pub label: Option<String>,
}

/// The open menu: search field plus list body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuView {
    pub search_text: String,
    pub search_placeholder: String,
    pub body: MenuBody,
}

/// What the list area shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum MenuBody {
    /// A lookup is in flight.
    Loading(String),
    /// Nothing to show: the "no results" or "no options" text.
    Empty(String),
    Options(Vec<OptionView>),
}

/// One rendered option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    /// Stable list key: identity key or `option-<index>`.
    pub key: String,
    pub text: String,
    pub selected: bool,
    pub highlighted: bool,

    /// Character ranges of `text` matching the search text, exclusive end.
    pub match_ranges: Vec<(usize, usize)>,
}

impl<T: Selectable + 'static> Dropdown<T> {
    /// Computes the current view.
    #[must_use]
    pub fn view(&self) -> DropdownView {
        let config = self.config();

        let trigger = TriggerView {
            text: self.display_value(),
            is_placeholder: self.value().is_none(),
            expanded: self.is_open(),
            disabled: self.is_disabled(),
            tab_index: if self.is_disabled() { -1 } else { 0 },
            label: config.name.clone(),
        };

        let menu = self.is_open().then(|| MenuView {
            search_text: self.search_text().to_string(),
            search_placeholder: config.search_placeholder.clone(),
            body: self.compute_body(),
        });

        DropdownView { trigger, menu }
    }

    fn compute_body(&self) -> MenuBody {
        let config = self.config();

        if self.is_loading() {
            return MenuBody::Loading(config.loading_text.clone());
        }

        let options = self.filtered_options();
        if options.is_empty() {
            let text = if self.search_text().is_empty() {
                &config.no_options_text
            } else {
                &config.no_results_text
            };
            return MenuBody::Empty(text.clone());
        }

        let matcher = SkimMatcherV2::default().ignore_case();
        let highlighted = self.highlighted_index();

        let items = options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let text = self.option_display(option);
                let match_ranges = highlight_ranges(&matcher, &text, self.search_text());
                OptionView {
                    key: option_key(option, index),
                    text,
                    selected: self.is_selected(option),
                    highlighted: highlighted == Some(index),
                    match_ranges,
                }
            })
            .collect();

        MenuBody::Options(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OptionItem, Record};
    use crate::lookup::async_lookup;
    use crate::Config;
    use futures_util::future::pending;

    fn colors() -> Vec<OptionItem> {
        vec![
            Record::with_id(1).label("Red").field("hex", "#ff0000").into(),
            Record::with_id(2).label("Blue").field("hex", "#0000ff").into(),
        ]
    }

    fn options_of(view: &DropdownView) -> &[OptionView] {
        match view.menu.as_ref().map(|menu| &menu.body) {
            Some(MenuBody::Options(items)) => items,
            other => panic!("expected options, got {other:?}"),
        }
    }

    #[test]
    fn closed_view_has_trigger_only() {
        let view = Dropdown::new(colors())
            .with_config(Config {
                name: Some("color".to_string()),
                ..Config::default()
            })
            .view();

        assert!(view.menu.is_none());
        assert!(view.trigger.is_placeholder);
        assert_eq!(view.trigger.text, Config::default().placeholder);
        assert_eq!(view.trigger.label.as_deref(), Some("color"));
        assert_eq!(view.trigger.tab_index, 0);
        assert!(!view.trigger.expanded);
    }

    #[test]
    fn disabled_trigger_leaves_tab_order() {
        let view = Dropdown::new(colors())
            .with_config(Config {
                disabled: true,
                ..Config::default()
            })
            .view();
        assert!(view.trigger.disabled);
        assert_eq!(view.trigger.tab_index, -1);
    }

    #[test]
    fn options_carry_keys_selection_and_highlight() {
        let options = colors();
        let mut dropdown = Dropdown::new(options.clone()).with_value(Some(options[1].clone()));
        dropdown.open();
        dropdown.move_highlight_next();

        let view = dropdown.view();
        let items = options_of(&view);
        assert_eq!(items[0].key, "1");
        assert!(items[0].highlighted);
        assert!(!items[0].selected);
        assert!(items[1].selected);
        assert_eq!(view.trigger.text, "Blue");
    }

    #[test]
    fn positional_keys_for_text_options() {
        let mut dropdown = Dropdown::new(vec![OptionItem::from("Kyiv"), OptionItem::from("Lviv")]);
        dropdown.open();
        let view = dropdown.view();
        let keys: Vec<&str> = options_of(&view).iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["option-0", "option-1"]);
    }

    #[test]
    fn empty_body_distinguishes_no_results_from_no_options() {
        let mut empty = Dropdown::new(Vec::<OptionItem>::new());
        empty.open();
        let body = empty.view().menu.unwrap().body;
        assert_eq!(body, MenuBody::Empty(Config::default().no_options_text));

        let mut dropdown = Dropdown::new(colors());
        dropdown.open();
        dropdown.set_search_text("green");
        let body = dropdown.view().menu.unwrap().body;
        assert_eq!(body, MenuBody::Empty(Config::default().no_results_text));
    }

    #[test]
    fn loading_body_while_lookup_in_flight() {
        let lookup = async_lookup(|_term: &str, _options: &[OptionItem]| pending::<crate::Result<Vec<OptionItem>>>());
        let mut dropdown = Dropdown::new(colors()).with_search_function(lookup);
        dropdown.open();
        dropdown.set_search_text("r");

        let menu = dropdown.view().menu.unwrap();
        assert_eq!(menu.search_text, "r");
        assert_eq!(menu.body, MenuBody::Loading(Config::default().loading_text));
    }

    #[test]
    fn custom_option_renderer_feeds_view() {
        let mut dropdown = Dropdown::new(colors()).with_render_option(|o: &OptionItem| {
            let hex = o.as_record().and_then(|r| r.extra.get("hex")).and_then(|v| v.as_str()).unwrap_or("");
            format!("{} ({hex})", o.display_text())
        });
        dropdown.open();
        let view = dropdown.view();
        assert_eq!(options_of(&view)[0].text, "Red (#ff0000)");
    }

    #[test]
    fn view_serializes_to_json() {
        let mut dropdown = Dropdown::new(colors());
        dropdown.open();
        let json = serde_json::to_value(dropdown.view()).unwrap();
        assert_eq!(json["menu"]["body"]["kind"], "options");
        assert_eq!(json["menu"]["body"]["content"][1]["text"], "Blue");
    }
}

//! End-to-end behaviour of the dropdown driven through `handle_event`.

use dropsearch::app::{ListenerRegistry, PointerHub};
use dropsearch::{
    async_lookup, handle_event, Action, Boundary, Config, Dropdown, Event, Key, OptionItem, Point, Rect,
    Selectable,
};
use futures_util::future::poll_fn;
use futures_util::task::noop_waker_ref;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

fn cities() -> Vec<OptionItem> {
    ["Kyiv", "Kharkiv", "Odesa"].into_iter().map(OptionItem::from).collect()
}

fn texts(options: &[OptionItem]) -> Vec<String> {
    options.iter().map(|o| o.display_text().into_owned()).collect()
}

#[derive(Default)]
struct Gate {
    result: Option<Vec<OptionItem>>,
    waker: Option<Waker>,
}

/// Lookup futures that stay pending until the test releases them by query.
#[derive(Default, Clone)]
struct Gates(Rc<RefCell<HashMap<String, Rc<RefCell<Gate>>>>>);

impl Gates {
    fn open(&self, query: &str) -> Rc<RefCell<Gate>> {
        Rc::clone(self.0.borrow_mut().entry(query.to_string()).or_default())
    }

    fn release(&self, query: &str, result: Vec<OptionItem>) {
        let gate = self.open(query);
        let mut gate = gate.borrow_mut();
        gate.result = Some(result);
        if let Some(waker) = gate.waker.take() {
            waker.wake();
        }
    }
}

fn gated_dropdown(gates: &Gates) -> Dropdown<OptionItem> {
    let gates = gates.clone();
    Dropdown::new(cities()).with_search_function(async_lookup(move |term: &str, _options: &[OptionItem]| {
        let gate = gates.open(term);
        poll_fn(move |cx: &mut Context<'_>| {
            let mut gate = gate.borrow_mut();
            match gate.result.take() {
                Some(options) => Poll::Ready(Ok::<_, dropsearch::DropdownError>(options)),
                None => {
                    gate.waker = Some(cx.waker().clone());
                    Poll::Pending
                }
            }
        })
    }))
}

fn next_completion(dropdown: &mut Dropdown<OptionItem>) -> dropsearch::LookupCompletion<OptionItem> {
    let mut cx = Context::from_waker(noop_waker_ref());
    match dropdown.poll_lookup(&mut cx) {
        Poll::Ready(Some(completion)) => completion,
        other => panic!("expected a completion, got {other:?}"),
    }
}

#[test]
fn case_insensitive_substring_filter() {
    let mut dropdown = Dropdown::new(cities());
    handle_event(&mut dropdown, Event::TriggerClick);
    handle_event(&mut dropdown, Event::SearchInput("kh".to_string()));

    assert_eq!(texts(dropdown.filtered_options()), vec!["Kharkiv"]);
}

#[test]
fn empty_search_shows_every_option_in_order() {
    let mut dropdown = Dropdown::new(cities());
    handle_event(&mut dropdown, Event::TriggerClick);
    handle_event(&mut dropdown, Event::SearchInput("o".to_string()));
    handle_event(&mut dropdown, Event::SearchInput(String::new()));

    assert_eq!(texts(dropdown.filtered_options()), vec!["Kyiv", "Kharkiv", "Odesa"]);
}

#[test]
fn disabled_control_stays_closed() {
    let mut dropdown = Dropdown::new(cities()).with_config(Config {
        disabled: true,
        ..Config::default()
    });

    assert!(!dropdown.toggle());
    assert_eq!(handle_event(&mut dropdown, Event::Key(Key::Enter)), (false, vec![]));
    assert_eq!(handle_event(&mut dropdown, Event::TriggerClick), (false, vec![]));
    assert!(!dropdown.is_open());
}

#[test]
fn no_value_shows_placeholder_exactly() {
    let dropdown = Dropdown::new(cities()).with_config(Config {
        placeholder: "Pick a city".to_string(),
        ..Config::default()
    });
    assert_eq!(dropdown.display_value(), "Pick a city");
    assert_eq!(dropdown.view().trigger.text, "Pick a city");
}

#[test]
fn stale_async_result_never_reaches_the_list() {
    let gates = Gates::default();
    let mut dropdown = gated_dropdown(&gates);
    handle_event(&mut dropdown, Event::TriggerClick);

    handle_event(&mut dropdown, Event::SearchInput("a".to_string()));
    handle_event(&mut dropdown, Event::SearchInput("ab".to_string()));
    assert!(dropdown.is_loading());
    assert_eq!(dropdown.lookups_in_flight(), 2);

    gates.release("a", vec![OptionItem::from("stale")]);
    let stale = next_completion(&mut dropdown);
    assert_eq!(stale.request.query, "a");
    assert_eq!(handle_event(&mut dropdown, Event::LookupCompleted(stale)), (false, vec![]));
    assert!(dropdown.is_loading());
    assert!(!texts(dropdown.filtered_options()).contains(&"stale".to_string()));

    gates.release("ab", vec![OptionItem::from("Kabul")]);
    let fresh = next_completion(&mut dropdown);
    let (render, _) = handle_event(&mut dropdown, Event::LookupCompleted(fresh));

    assert!(render);
    assert!(!dropdown.is_loading());
    assert_eq!(texts(dropdown.filtered_options()), vec!["Kabul"]);
    assert_eq!(dropdown.lookups_in_flight(), 0);
}

#[test]
fn async_result_for_replaced_text_is_discarded_even_when_latest() {
    let gates = Gates::default();
    let mut dropdown = gated_dropdown(&gates);
    handle_event(&mut dropdown, Event::TriggerClick);
    handle_event(&mut dropdown, Event::SearchInput("a".to_string()));
    handle_event(&mut dropdown, Event::SearchInput(String::new()));

    assert!(!dropdown.is_loading());
    gates.release("a", vec![OptionItem::from("stale")]);
    let completion = next_completion(&mut dropdown);
    handle_event(&mut dropdown, Event::LookupCompleted(completion));

    assert_eq!(texts(dropdown.filtered_options()), vec!["Kyiv", "Kharkiv", "Odesa"]);
}

#[test]
fn arrow_down_after_cancelled_lookup_highlights_first_option() {
    let gates = Gates::default();
    let mut dropdown = gated_dropdown(&gates);
    handle_event(&mut dropdown, Event::TriggerClick);
    handle_event(&mut dropdown, Event::SearchInput("o".to_string()));
    handle_event(&mut dropdown, Event::Key(Key::Escape));

    let (_, actions) = handle_event(&mut dropdown, Event::Key(Key::ArrowDown));
    assert_eq!(actions.len(), 2);
    assert_eq!(dropdown.highlighted_index(), Some(0));
    assert_eq!(dropdown.search_text(), "");
}

#[test]
fn keyboard_navigation_wraps_and_commits() {
    let chosen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&chosen);
    let mut dropdown = Dropdown::new(cities()).with_on_change(move |o: &OptionItem| sink.borrow_mut().push(o.clone()));

    handle_event(&mut dropdown, Event::Key(Key::ArrowDown));
    assert_eq!(dropdown.highlighted_index(), Some(0));

    let (_, actions) = handle_event(&mut dropdown, Event::Key(Key::ArrowUp));
    assert_eq!(dropdown.highlighted_index(), Some(2));
    assert_eq!(actions, vec![Action::scroll_to(2)]);

    handle_event(&mut dropdown, Event::Key(Key::ArrowDown));
    assert_eq!(dropdown.highlighted_index(), Some(0));

    handle_event(&mut dropdown, Event::Key(Key::End));
    handle_event(&mut dropdown, Event::Key(Key::Space));

    assert_eq!(texts(&chosen.borrow()), vec!["Odesa"]);
    assert!(!dropdown.is_open());
    assert_eq!(dropdown.highlighted_index(), None);
}

#[test]
fn committing_a_filtered_option_passes_that_option() {
    let chosen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&chosen);
    let mut dropdown = Dropdown::new(cities()).with_on_change(move |o: &OptionItem| sink.borrow_mut().push(o.clone()));

    handle_event(&mut dropdown, Event::TriggerClick);
    handle_event(&mut dropdown, Event::SearchInput("e".to_string()));
    handle_event(&mut dropdown, Event::OptionClick(0));

    assert_eq!(texts(&chosen.borrow()), vec!["Odesa"]);
    assert_eq!(dropdown.search_text(), "");
    assert_eq!(dropdown.filtered_options().len(), 3);
}

#[test]
fn reopening_resets_search_and_highlight() {
    let mut dropdown = Dropdown::new(cities());
    handle_event(&mut dropdown, Event::TriggerClick);
    handle_event(&mut dropdown, Event::SearchInput("k".to_string()));
    handle_event(&mut dropdown, Event::Key(Key::ArrowDown));
    handle_event(&mut dropdown, Event::TriggerClick);
    handle_event(&mut dropdown, Event::TriggerClick);

    assert!(dropdown.is_open());
    assert_eq!(dropdown.search_text(), "");
    assert_eq!(dropdown.highlighted_index(), None);
}

#[test]
fn outside_pointer_closes_and_inside_does_not() {
    let registry = Rc::new(ListenerRegistry::new());
    let hub: Rc<dyn PointerHub> = registry.clone();
    let closes = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&closes);
    let mut dropdown = Dropdown::new(cities())
        .with_pointer_hub(hub)
        .with_on_close(move || *counter.borrow_mut() += 1);

    handle_event(&mut dropdown, Event::TriggerClick);
    handle_event(
        &mut dropdown,
        Event::Layout(Boundary {
            trigger: Some(Rect::new(0.0, 0.0, 200.0, 30.0)),
            menu: Some(Rect::new(0.0, 32.0, 200.0, 240.0)),
        }),
    );
    assert_eq!(registry.active_count(), 1);

    let (render, _) = handle_event(&mut dropdown, Event::PointerDown(Point::new(100.0, 120.0)));
    assert!(!render);
    assert!(dropdown.is_open());

    let (render, _) = handle_event(&mut dropdown, Event::PointerDown(Point::new(400.0, 120.0)));
    assert!(render);
    assert!(!dropdown.is_open());
    assert_eq!(registry.active_count(), 0);
    assert_eq!(*closes.borrow(), 1);
}

#[test]
fn teardown_releases_listener_without_close_hook() {
    let registry = Rc::new(ListenerRegistry::new());
    let hub: Rc<dyn PointerHub> = registry.clone();
    let closes = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&closes);
    let mut dropdown = Dropdown::new(cities())
        .with_pointer_hub(hub)
        .with_on_close(move || *counter.borrow_mut() += 1);

    handle_event(&mut dropdown, Event::TriggerClick);
    handle_event(&mut dropdown, Event::Teardown);

    assert!(!dropdown.is_open());
    assert_eq!(registry.active_count(), 0);
    assert_eq!(*closes.borrow(), 0);
}

//! End-to-end behaviour of the selection policy on the reference collection

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use cycle_core::{
    AutoSelectMode, CollectionEvent, CollectionSubscriber, CycleError, EventKind,
    ObservableCollection, OrderedCollection, RawCycleOptions, SelectionModel, SelectionNavigable,
    SelectionPolicy, SelectionPolicyBuilder, SelectionPolicyHost,
};

use crate::{CollectionConfig, Item, SelectableCollection};

type Letter = Item<&'static str>;
type Letters = SelectableCollection<&'static str>;

fn letters(values: &[&'static str]) -> Vec<Letter> {
    values.iter().map(|value| Item::new(*value)).collect()
}

fn selected_value(collection: &Letters, label: &str) -> Option<&'static str> {
    collection.selected(label).map(|item| *item.value())
}

/// Records `Selected` events as "label:value"
#[derive(Default)]
struct SelectionLog {
    entries: Mutex<Vec<String>>,
}

impl CollectionSubscriber<Letter> for SelectionLog {
    fn on_collection_event(&self, event: &CollectionEvent<Letter>) {
        if let CollectionEvent::Selected { item, label } = event {
            self.entries.lock().push(format!("{}:{}", label, item.value()));
        }
    }
}

fn watch_selections(collection: &Letters) -> Arc<SelectionLog> {
    let log = Arc::new(SelectionLog::default());
    let subscriber: Arc<dyn CollectionSubscriber<Letter>> = log.clone();
    let weak: Weak<dyn CollectionSubscriber<Letter>> = Arc::downgrade(&subscriber);
    collection.subscribe(weak, &[EventKind::Selected]);
    log
}

#[test]
fn test_removal_repair_table() -> anyhow::Result<()> {
    let table = [
        ("prev", ["c", "a", "b"]),
        ("prevNoLoop", ["b", "a", "b"]),
        ("next", ["b", "c", "a"]),
        ("nextNoLoop", ["b", "c", "b"]),
    ];
    
    for (mode, expected) in table {
        for (removed_at, want) in expected.iter().enumerate() {
            let items = letters(&["a", "b", "c"]);
            let collection = Letters::with_policy(
                CollectionConfig::default(),
                items.clone(),
                RawCycleOptions::new().select_if_removed(mode),
            )?;
            
            collection.select(&items[removed_at], "selected")?;
            collection.remove(&items[removed_at])?;
            
            assert_eq!(
                selected_value(&collection, "selected"),
                Some(*want),
                "{} removing position {}",
                mode,
                removed_at
            );
        }
    }
    Ok(())
}

#[test]
fn test_prev_no_loop_removing_first_selects_new_first() -> anyhow::Result<()> {
    let items = letters(&["a", "b", "c"]);
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        items.clone(),
        RawCycleOptions::new().auto_select("first").select_if_removed("prevNoLoop"),
    )?;
    assert_eq!(selected_value(&collection, "selected"), Some("a"));
    
    collection.remove(&items[0])?;
    
    assert_eq!(selected_value(&collection, "selected"), Some("b"));
    Ok(())
}

#[test]
fn test_explicit_deselect_is_not_repaired() -> anyhow::Result<()> {
    let items = letters(&["a", "b", "c"]);
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        items.clone(),
        RawCycleOptions::new().select_if_removed("next"),
    )?;
    
    collection.select(&items[1], "selected")?;
    collection.deselect("selected");
    
    assert_eq!(collection.selected("selected"), None);
    Ok(())
}

#[test]
fn test_removing_unselected_item_keeps_selection() -> anyhow::Result<()> {
    let items = letters(&["a", "b", "c"]);
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        items.clone(),
        RawCycleOptions::new().select_if_removed("prev"),
    )?;
    
    collection.select(&items[2], "selected")?;
    collection.remove(&items[0])?;
    
    assert_eq!(selected_value(&collection, "selected"), Some("c"));
    Ok(())
}

#[test]
fn test_removing_last_item_leaves_nothing_to_repair() -> anyhow::Result<()> {
    let items = letters(&["only"]);
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        items.clone(),
        RawCycleOptions::new().select_if_removed("prev"),
    )?;
    
    collection.select(&items[0], "selected")?;
    collection.remove(&items[0])?;
    
    assert!(collection.is_empty());
    assert_eq!(collection.selected("selected"), None);
    Ok(())
}

#[test]
fn test_repair_only_applies_to_configured_label() -> anyhow::Result<()> {
    let items = letters(&["a", "b", "c"]);
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        items.clone(),
        RawCycleOptions::new().select_if_removed_for("starred", "next"),
    )?;
    
    collection.select(&items[1], "selected")?;
    collection.select(&items[1], "starred")?;
    collection.remove(&items[1])?;
    
    assert_eq!(collection.selected("selected"), None);
    assert_eq!(selected_value(&collection, "starred"), Some("c"));
    Ok(())
}

#[test]
fn test_label_isolation() -> anyhow::Result<()> {
    let items = letters(&["a", "b", "c"]);
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        items.clone(),
        RawCycleOptions::new()
            .auto_select_for("selected", "first")
            .auto_select_for("starred", "last"),
    )?;
    
    assert_eq!(selected_value(&collection, "selected"), Some("a"));
    assert_eq!(selected_value(&collection, "starred"), Some("c"));
    
    collection.select(&items[1], "selected")?;
    collection.select_next("starred")?;
    
    assert_eq!(selected_value(&collection, "selected"), Some("b"));
    assert_eq!(selected_value(&collection, "starred"), Some("a"));
    assert!(items[0].is_selected("starred"));
    assert!(!items[0].is_selected("selected"));
    Ok(())
}

#[test]
fn test_batch_add_defers_to_preselected_item() -> anyhow::Result<()> {
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        Vec::new(),
        RawCycleOptions::new().auto_select_for("x", "first"),
    )?;
    let log = watch_selections(&collection);
    
    let items = letters(&["one", "two", "three"]);
    items[1].mark_selected("x");
    collection.add_all(items.clone());
    
    assert_eq!(selected_value(&collection, "x"), Some("two"));
    assert!(!items[0].is_selected("x"));
    assert_eq!(*log.entries.lock(), vec!["x:two".to_string()]);
    
    let policy = collection.selection_policy().expect("policy attached");
    assert!(!policy.is_skipping("x"));
    Ok(())
}

#[test]
fn test_one_by_one_adds_end_with_preselected_item() -> anyhow::Result<()> {
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        Vec::new(),
        RawCycleOptions::new().auto_select_for("x", "first"),
    )?;
    
    let items = letters(&["one", "two", "three"]);
    items[1].mark_selected("x");
    for item in &items {
        collection.add(item.clone());
    }
    
    assert_eq!(selected_value(&collection, "x"), Some("two"));
    assert!(!items[0].is_selected("x"));
    assert!(!items[2].is_selected("x"));
    Ok(())
}

#[test]
fn test_batch_add_without_preselection_selects_once() -> anyhow::Result<()> {
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        Vec::new(),
        RawCycleOptions::new().auto_select("last"),
    )?;
    let log = watch_selections(&collection);
    
    collection.add_all(letters(&["a", "b", "c"]));
    
    // Each add event sees the full post-insert sequence
    assert_eq!(selected_value(&collection, "selected"), Some("c"));
    assert_eq!(*log.entries.lock(), vec!["selected:c".to_string()]);
    Ok(())
}

#[test]
fn test_auto_select_is_idempotent() -> anyhow::Result<()> {
    let items = letters(&["a", "b", "c"]);
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        items.clone(),
        RawCycleOptions::new().auto_select("first"),
    )?;
    assert_eq!(selected_value(&collection, "selected"), Some("a"));
    let log = watch_selections(&collection);
    
    collection.reset(items.clone());
    collection.add(items[1].clone());
    
    assert_eq!(selected_value(&collection, "selected"), Some("a"));
    assert!(log.entries.lock().is_empty());
    
    collection.select(&items[2], "selected")?;
    collection.add(Item::new("d"));
    assert_eq!(selected_value(&collection, "selected"), Some("c"));
    Ok(())
}

#[test]
fn test_reset_auto_selects_and_adopts() -> anyhow::Result<()> {
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        letters(&["a", "b"]),
        RawCycleOptions::new().auto_select(1i64),
    )?;
    assert_eq!(selected_value(&collection, "selected"), Some("b"));
    
    collection.reset(letters(&["c", "d", "e"]));
    assert_eq!(selected_value(&collection, "selected"), Some("d"));
    
    let fresh = letters(&["f", "g"]);
    fresh[0].mark_selected("selected");
    collection.reset(fresh.clone());
    assert_eq!(selected_value(&collection, "selected"), Some("f"));
    
    collection.reset(letters(&["only"]));
    assert_eq!(collection.selected("selected"), None);
    Ok(())
}

#[test]
fn test_out_of_range_index_selects_nothing() -> anyhow::Result<()> {
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        letters(&["a", "b", "c"]),
        RawCycleOptions::new().auto_select("5"),
    )?;
    
    assert_eq!(collection.selected("selected"), None);
    assert_eq!(
        collection.cycle_options().and_then(|options| options.auto_select_for("selected")),
        Some(AutoSelectMode::Index(5))
    );
    Ok(())
}

#[test]
fn test_first_add_to_empty_collection_is_selected() -> anyhow::Result<()> {
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        Vec::new(),
        RawCycleOptions::new().auto_select("first"),
    )?;
    assert_eq!(collection.selected("selected"), None);
    
    collection.add(Item::new("a"));
    
    assert_eq!(selected_value(&collection, "selected"), Some("a"));
    Ok(())
}

#[test]
fn test_invalid_option_fails_before_subscribing() {
    let collection = Letters::from_items(CollectionConfig::default(), letters(&["a", "b"]));
    
    let result = SelectionPolicy::<Letters>::builder(RawCycleOptions::new().auto_select("middle"))
        .initial_items(collection.items())
        .apply(&collection);
    
    match result {
        Err(CycleError::InvalidOption { option, value, .. }) => {
            assert_eq!(option, "autoSelect");
            assert_eq!(value, "middle");
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("invalid option was accepted"),
    }
    assert_eq!(collection.subscriber_count(), 0);
    assert!(collection.selection_policy().is_none());
    
    collection.add(Item::new("c"));
    assert_eq!(collection.selected("selected"), None);
}

#[test]
fn test_ignored_label_is_a_setup_error() {
    let config = CollectionConfig::default().ignore_label("starred");
    let result = Letters::with_policy(
        config,
        letters(&["a"]),
        RawCycleOptions::new().select_if_removed_for("starred", "prev"),
    );
    
    assert_eq!(
        result.err(),
        Some(CycleError::IgnoredLabel {
            option: "selectIfRemoved",
            label: "starred".to_string(),
        })
    );
}

#[test]
fn test_initial_items_are_required() {
    let collection = Letters::new();
    
    let missing = SelectionPolicyBuilder::new(RawCycleOptions::new().auto_select("first")).apply(&collection);
    assert_eq!(missing.err(), Some(CycleError::MissingArgument("initial items")));
    
    let empty = SelectionPolicyBuilder::new(RawCycleOptions::new().auto_select("first"))
        .without_initial_items()
        .apply(&collection);
    assert!(empty.is_ok());
}

#[test]
fn test_inactive_policy_does_not_subscribe() -> anyhow::Result<()> {
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        letters(&["a"]),
        RawCycleOptions::new().auto_select("none").select_if_removed("none"),
    )?;
    
    let policy = collection.selection_policy().expect("policy attached");
    assert!(policy.subscriptions().is_empty());
    assert_eq!(collection.subscriber_count(), 0);
    Ok(())
}

#[test]
fn test_subscriptions_follow_active_options() -> anyhow::Result<()> {
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        letters(&["a"]),
        RawCycleOptions::new().select_if_removed("next"),
    )?;
    
    let policy = collection.selection_policy().expect("policy attached");
    let subscriptions = policy.subscriptions();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].kinds(), &[EventKind::Deselected]);
    Ok(())
}

#[test]
fn test_teardown_stops_handling() -> anyhow::Result<()> {
    let items = letters(&["a", "b", "c"]);
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        items.clone(),
        RawCycleOptions::new().auto_select("first").select_if_removed("next"),
    )?;
    let policy = collection.selection_policy().expect("policy attached");
    
    assert_eq!(policy.teardown(), 1);
    assert_eq!(collection.subscriber_count(), 0);
    
    collection.remove(&items[0])?;
    assert_eq!(collection.selected("selected"), None);
    
    collection.reset(letters(&["d", "e"]));
    assert_eq!(collection.selected("selected"), None);
    Ok(())
}

#[test]
fn test_reapplying_replaces_previous_policy() -> anyhow::Result<()> {
    let items = letters(&["a", "b", "c"]);
    let collection = Letters::with_policy(
        CollectionConfig::default(),
        items.clone(),
        RawCycleOptions::new().select_if_removed("next"),
    )?;
    
    SelectionPolicy::<Letters>::builder(RawCycleOptions::new().select_if_removed("prev"))
        .initial_items(collection.items())
        .apply(&collection)?;
    assert_eq!(collection.subscriber_count(), 1);
    
    collection.select(&items[1], "selected")?;
    collection.remove(&items[1])?;
    assert_eq!(selected_value(&collection, "selected"), Some("a"));
    Ok(())
}

#[test]
fn test_policy_from_json_options() -> anyhow::Result<()> {
    let options = RawCycleOptions::from_json(r#"{"autoSelect": "last", "selectIfRemoved": "prevNoLoop"}"#)?;
    let items = letters(&["a", "b", "c"]);
    let collection = Letters::with_policy(CollectionConfig::default(), items.clone(), options)?;
    
    assert_eq!(selected_value(&collection, "selected"), Some("c"));
    collection.remove(&items[2])?;
    assert_eq!(selected_value(&collection, "selected"), Some("b"));
    Ok(())
}

/// Removes the first item whenever the collection is reset
struct DropFirstOnReset {
    collection: Weak<Letters>,
}

impl CollectionSubscriber<Letter> for DropFirstOnReset {
    fn on_collection_event(&self, event: &CollectionEvent<Letter>) {
        let CollectionEvent::Reset { .. } = event else {
            return;
        };
        let Some(collection) = self.collection.upgrade() else {
            return;
        };
        if let Some(first) = collection.at(0) {
            let _ = collection.remove(&first);
        }
    }
}

#[test]
fn test_reset_tolerates_reentrant_removal() -> anyhow::Result<()> {
    let collection = Letters::new();
    let dropper: Arc<dyn CollectionSubscriber<Letter>> = Arc::new(DropFirstOnReset {
        collection: Arc::downgrade(&collection),
    });
    collection.subscribe(Arc::downgrade(&dropper), &[EventKind::Reset]);
    
    SelectionPolicyBuilder::new(RawCycleOptions::new().auto_select("first"))
        .without_initial_items()
        .apply(&collection)?;
    
    collection.reset(letters(&["a", "b", "c"]));
    
    assert_eq!(collection.len(), 2);
    assert_eq!(selected_value(&collection, "selected"), Some("b"));
    Ok(())
}

#[test]
fn test_batch_end_clears_leftover_skip_flag() -> anyhow::Result<()> {
    // Flagged through another collection, so this one never adopts it
    let shared = Item::new("s");
    let collection = Letters::from_items(CollectionConfig::default(), vec![shared.clone()]);
    let elsewhere = Letters::from_items(CollectionConfig::default(), vec![shared.clone()]);
    elsewhere.select(&shared, "selected")?;
    
    let policy = SelectionPolicyBuilder::new(RawCycleOptions::new().auto_select("last"))
        .without_initial_items()
        .apply(&collection)?;
    
    collection.add_all(letters(&["a", "b"]));
    
    assert_eq!(selected_value(&collection, "selected"), Some("b"));
    assert!(!policy.is_skipping("selected"));
    assert_eq!(selected_value(&elsewhere, "selected"), Some("s"));
    Ok(())
}

#[test]
fn test_initial_pass_failure_is_returned() {
    let collection = Letters::new();
    
    let result = SelectionPolicyBuilder::new(RawCycleOptions::new().auto_select("first"))
        .initial_items(letters(&["stranger"]))
        .apply(&collection);
    
    assert_eq!(result.err(), Some(CycleError::NotAMember));
    assert_eq!(collection.subscriber_count(), 0);
    assert!(collection.selection_policy().is_none());
}

//! End-to-end behaviour of the form store, factory, validation and
//! persistence working together.

use ecrf_core::controls::{ChoiceOption, Radio, RadioOptions};
use ecrf_core::{
    ContainerId, Control, ControlId, ControlKind, EngineConfig, Form, FormError, FormRepository,
    FormStore, KeyValueStore, MemoryStore, OptionMap, validate,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

fn store_with_memory() -> (Arc<MemoryStore>, FormStore) {
    let backend = Arc::new(MemoryStore::new());
    let store = FormStore::new(Form::new("Intake"), EngineConfig::default())
        .with_repository(FormRepository::new(backend.clone()));
    (backend, store)
}

fn add(store: &mut FormStore, tag: &str, target: &ContainerId) -> ControlId {
    store
        .add_control(tag, OptionMap::new(), target, usize::MAX)
        .unwrap()
}

fn assert_unique_ids(form: &Form) {
    let ids = form.all_control_ids();
    let unique: HashSet<ControlId> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len(), "duplicate ids in {:?}", ids);
}

#[test]
fn move_text_input_into_first_column() {
    let (_, mut store) = store_with_memory();
    let a = add(&mut store, "TextInput", &ContainerId::Root);
    let b = add(&mut store, "Columns", &ContainerId::Root);

    let target: ContainerId = format!("column-0-{}", b).parse().unwrap();
    let source: ContainerId = "main-canvas".parse().unwrap();
    store.move_control(a, &source, &target, 0).unwrap();

    let form = store.form();
    assert_eq!(form.container.ids(), vec![b]);
    assert_eq!(form.resolve_container(&target).unwrap().ids(), vec![a]);
    assert!(form.resolve_container(&ContainerId::column(1, b)).unwrap().is_empty());
}

#[test]
fn empty_untitled_form_reports_both_errors() {
    let report = validate(&Form::new(""));
    assert!(!report.valid);
    assert_eq!(
        report.errors,
        vec!["Form must have a title", "Form must have at least one control"]
    );
}

#[test]
fn unknown_type_tag_builds_text_input() {
    let (_, mut store) = store_with_memory();
    let id = store
        .add_control(
            "Bogus",
            json!({ "title": "Mystery" }).as_object().cloned().unwrap(),
            &ContainerId::Root,
            0,
        )
        .unwrap();

    let control = store.form().find_control(id).unwrap();
    assert_eq!(control.kind(), ControlKind::TextInput);
    assert_eq!(control.title(), "Mystery");
    assert!(store.validation().valid);
}

#[test]
fn duplicated_radio_gets_new_group_and_id() {
    let (_, mut store) = store_with_memory();
    let radio = Radio::new(
        "Consent".to_string(),
        RadioOptions {
            group_name: "g1".to_string(),
            options: vec![ChoiceOption::new("Yes", "yes"), ChoiceOption::new("No", "no")],
            ..Default::default()
        },
    );
    let radio = Control::Radio(radio);
    let id = radio.id();
    store.insert_control(&ContainerId::Root, 0, radio).unwrap();

    let copy_id = store.duplicate_control(id).unwrap();

    let form = store.form();
    let (Some(Control::Radio(original)), Some(Control::Radio(copy))) =
        (form.find_control(id), form.find_control(copy_id))
    else {
        panic!("expected two radios");
    };
    assert_ne!(copy_id, id);
    assert_eq!(original.options.group_name, "g1");
    assert_ne!(copy.options.group_name, "g1");
    assert_eq!(copy.options.options, original.options.options);
    assert_unique_ids(form);
}

#[test]
fn loading_missing_key_keeps_current_form() {
    let (_, mut store) = store_with_memory();
    add(&mut store, "TextInput", &ContainerId::Root);
    let before = store.snapshot().form.clone();

    assert!(!store.load("missing-key"));
    assert!(Arc::ptr_eq(&store.snapshot().form, &before));
}

#[test]
fn reorder_drops_foreign_ids() {
    let (_, mut store) = store_with_memory();
    let x = add(&mut store, "TextInput", &ContainerId::Root);
    let y = add(&mut store, "TextInput", &ContainerId::Root);
    let z = add(&mut store, "TextInput", &ContainerId::Root);
    let w = ControlId::new_v4();

    store.reorder(&ContainerId::Root, &[z, x, y, w]).unwrap();
    assert_eq!(store.form().container.ids(), vec![z, x, y]);
}

#[test]
fn reorder_with_current_order_is_idempotent() {
    let (_, mut store) = store_with_memory();
    for tag in ["TextInput", "Select", "DatePicker"] {
        add(&mut store, tag, &ContainerId::Root);
    }
    let before = store.form().container.clone();

    let order = before.ids();
    store.reorder(&ContainerId::Root, &order).unwrap();
    assert_eq!(store.form().container, before);
}

#[test]
fn moves_preserve_count_and_exclusive_ownership() {
    let (_, mut store) = store_with_memory();
    let layout = add(&mut store, "Columns", &ContainerId::Root);
    let left = ContainerId::column(0, layout);
    let right = ContainerId::column(1, layout);
    let fields: Vec<ControlId> = ["TextInput", "NumberInput", "Checkbox"]
        .into_iter()
        .map(|tag| add(&mut store, tag, &ContainerId::Root))
        .collect();
    let count = store.form().control_count();

    store.move_control(fields[0], &ContainerId::Root, &left, 0).unwrap();
    store.move_control(fields[1], &ContainerId::Root, &right, 5).unwrap();
    store.move_control(fields[0], &left, &right, 0).unwrap();
    store.move_control(fields[2], &ContainerId::Root, &ContainerId::Root, 0).unwrap();

    let form = store.form();
    assert_eq!(form.control_count(), count);
    assert_unique_ids(form);
    assert_eq!(form.resolve_container(&right).unwrap().ids(), vec![fields[0], fields[1]]);
    assert!(form.resolve_container(&left).unwrap().is_empty());
    assert_eq!(form.container.ids(), vec![fields[2], layout]);
}

#[test]
fn failed_move_leaves_state_untouched() {
    let (_, mut store) = store_with_memory();
    let a = add(&mut store, "TextInput", &ContainerId::Root);
    let layout = add(&mut store, "Columns", &ContainerId::Root);
    let before = store.snapshot().form.clone();

    let result = store.move_control(a, &ContainerId::Root, &ContainerId::column(9, layout), 0);
    assert!(matches!(result, Err(FormError::ContainerNotFound(_))));

    let result = store.move_control(layout, &ContainerId::Root, &ContainerId::column(0, layout), 0);
    assert!(matches!(result, Err(FormError::ContainerNotFound(_))));

    assert!(Arc::ptr_eq(&store.snapshot().form, &before));
}

#[test]
fn nested_layouts_bounded_by_config() {
    let config = EngineConfig {
        max_column_depth: 2,
        ..Default::default()
    };
    let mut store = FormStore::new(Form::new("Nested"), config);
    let outer = add(&mut store, "Columns", &ContainerId::Root);
    let inner = add(&mut store, "Columns", &ContainerId::column(0, outer));

    let result = store.add_control(
        "Columns",
        OptionMap::new(),
        &ContainerId::column(0, inner),
        0,
    );
    assert!(matches!(result, Err(FormError::NestingTooDeep { depth: 3, max: 2 })));
}

#[test]
fn duplicated_layout_has_fresh_nested_ids() {
    let (_, mut store) = store_with_memory();
    let layout = add(&mut store, "Columns", &ContainerId::Root);
    add(&mut store, "TextInput", &ContainerId::column(0, layout));
    add(&mut store, "Radio", &ContainerId::column(1, layout));

    store.duplicate_control(layout).unwrap();

    assert_eq!(store.form().control_count(), 6);
    assert_unique_ids(store.form());
}

#[test]
fn save_then_load_roundtrips_except_updated_at() {
    let (backend, mut store) = store_with_memory();
    let layout = add(&mut store, "Columns", &ContainerId::Root);
    add(&mut store, "TimePicker", &ContainerId::column(1, layout));
    store.set_description("Baseline");
    let saved = store.form().clone();

    let key = store.save(None).unwrap();
    assert!(backend.contains(&format!("ecrf_{}", key)).unwrap());

    let mut other = FormStore::new(Form::default(), EngineConfig::default())
        .with_repository(FormRepository::new(backend));
    assert!(other.load(&key));

    let mut loaded = other.form().clone();
    assert!(loaded.updated_at >= saved.updated_at);
    loaded.updated_at = saved.updated_at;
    assert_eq!(loaded, saved);
}

#[test]
fn undo_restores_previous_snapshot() {
    let (_, mut store) = store_with_memory();
    let a = add(&mut store, "TextInput", &ContainerId::Root);
    let layout = add(&mut store, "Columns", &ContainerId::Root);
    store
        .move_control(a, &ContainerId::Root, &ContainerId::column(0, layout), 0)
        .unwrap();

    assert!(store.undo());
    assert_eq!(store.form().locate_control(a), Some(ContainerId::Root));
    assert!(store.redo());
    assert_eq!(store.form().locate_control(a), Some(ContainerId::column(0, layout)));
}

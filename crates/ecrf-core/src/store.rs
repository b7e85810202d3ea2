//! The form store: holds the current snapshot and applies every change.
//!
//! Each successful mutation produces a new snapshot (form plus validation
//! report), records the previous one for undo and pushes the new one to all
//! subscribers before returning. A failed mutation publishes nothing.

use crate::config::EngineConfig;
use crate::container::ContainerId;
use crate::controls::{Control, ControlId};
use crate::drop::{self, DropAction, DropEvent};
use crate::error::{FormError, FormResult};
use crate::factory::{ControlFactory, OptionMap};
use crate::form::{Form, FormStatus};
use crate::history::History;
use crate::notify::{LogNotifier, Notifier};
use crate::storage::FormRepository;
use crate::validation::{ValidationReport, validate};
use chrono::Utc;
use std::sync::Arc;

/// An immutable, validated state of the form.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub form: Arc<Form>,
    pub validation: ValidationReport,
}

impl Snapshot {
    /// Validate `form` and wrap it.
    pub fn new(form: Form) -> Self {
        let validation = validate(&form);
        Self {
            form: Arc::new(form),
            validation,
        }
    }
}

/// Handle returned by [`FormStore::subscribe`].
pub type SubscriptionId = u64;

type Subscriber = Box<dyn FnMut(&Snapshot)>;

/// Result of a configuration dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome {
    /// The control as configured by the user. Same id and variant.
    Configured(Control),
    Cancelled,
}

/// Central state holder of the builder.
pub struct FormStore {
    history: History<Snapshot>,
    factory: ControlFactory,
    notifier: Arc<dyn Notifier>,
    repository: Option<FormRepository>,
    config: EngineConfig,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
    /// Highest version committed so far. Survives undo, so every commit gets
    /// a version no earlier snapshot carries.
    last_version: u64,
}

impl FormStore {
    /// Create a store holding `form`.
    pub fn new(form: Form, config: EngineConfig) -> Self {
        let last_version = form.version;
        Self {
            history: History::new(Snapshot::new(form), config.history_limit),
            factory: ControlFactory::default(),
            notifier: Arc::new(LogNotifier),
            repository: None,
            config,
            subscribers: Vec::new(),
            next_subscription: 0,
            last_version,
        }
    }

    pub fn with_factory(mut self, factory: ControlFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_repository(mut self, repository: FormRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        self.history.present()
    }

    /// The current form.
    pub fn form(&self) -> &Form {
        &self.snapshot().form
    }

    /// Validation report of the current form.
    pub fn validation(&self) -> &ValidationReport {
        &self.snapshot().validation
    }

    pub fn factory(&self) -> &ControlFactory {
        &self.factory
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a subscriber. It receives the current snapshot right away
    /// and every published snapshot after that.
    pub fn subscribe(&mut self, mut subscriber: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        subscriber(self.snapshot());
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn publish(&mut self) {
        let snapshot = self.history.present().clone();
        log::debug!(
            "Publishing form {} v{} ({} errors)",
            snapshot.form.id,
            snapshot.form.version,
            snapshot.validation.errors.len()
        );
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&snapshot);
        }
    }

    fn commit(&mut self, mut form: Form) {
        form.touch();
        form.version = form.version.max(self.last_version + 1);
        self.last_version = form.version;
        self.history.push(Snapshot::new(form));
        self.publish();
    }

    /// Apply `change` to a copy of the current form and commit it if it
    /// succeeds. Containers share untouched controls with the previous
    /// snapshot, so the copy only costs the path that changes.
    fn mutate<T>(&mut self, change: impl FnOnce(&mut Form) -> FormResult<T>) -> FormResult<T> {
        let mut form = self.form().clone();
        match change(&mut form) {
            Ok(result) => {
                self.commit(form);
                Ok(result)
            }
            Err(e) => {
                log::warn!("Change rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Apply a change that cannot fail and commit it.
    fn update(&mut self, change: impl FnOnce(&mut Form)) {
        let mut form = self.form().clone();
        change(&mut form);
        self.commit(form);
    }

    /// Create a control from a type tag and insert it into `target`.
    pub fn add_control(
        &mut self,
        type_tag: &str,
        options: OptionMap,
        target: &ContainerId,
        index: usize,
    ) -> FormResult<ControlId> {
        let control = self.factory.create_control(type_tag, options);
        let id = control.id();
        self.insert_control(target, index, control)?;
        Ok(id)
    }

    /// Insert an already built control into `target` at `index` (clamped).
    pub fn insert_control(
        &mut self,
        target: &ContainerId,
        index: usize,
        control: Control,
    ) -> FormResult<usize> {
        let max_depth = self.config.max_column_depth;
        self.mutate(|form| form.insert_control(target, index, control, max_depth))
    }

    /// Move a control between (or within) containers.
    ///
    /// Dropping a control back onto its own position changes nothing but
    /// still republishes the current snapshot.
    pub fn move_control(
        &mut self,
        id: ControlId,
        source: &ContainerId,
        target: &ContainerId,
        index: usize,
    ) -> FormResult<usize> {
        if source == target {
            let unchanged = self.form().resolve_container(source).and_then(|container| {
                let position = container.position(id)?;
                (position == index.min(container.len() - 1)).then_some(position)
            });
            if let Some(position) = unchanged {
                self.publish();
                return Ok(position);
            }
        }

        let max_depth = self.config.max_column_depth;
        let at = self.mutate(|form| form.move_control(id, source, target, index, max_depth))?;
        log::info!("Moved control {} to {} at {}", id, target, at);
        self.notifier.info("Control moved");
        Ok(at)
    }

    /// Reorder the direct children of `container`.
    pub fn reorder(&mut self, container: &ContainerId, order: &[ControlId]) -> FormResult<()> {
        self.mutate(|form| form.reorder_container(container, order))
    }

    /// Insert a copy of a control directly after it. Returns the copy's id.
    pub fn duplicate_control(&mut self, id: ControlId) -> FormResult<ControlId> {
        let form = self.form();
        let original = form.find_control(id).ok_or(FormError::UnknownControl(id))?;
        let container = form.locate_control(id).ok_or(FormError::UnknownControl(id))?;
        let position = form
            .resolve_container(&container)
            .and_then(|c| c.position(id))
            .ok_or(FormError::UnknownControl(id))?;

        let copy = self.factory.duplicate(original);
        let copy_id = copy.id();
        self.insert_control(&container, position + 1, copy)?;
        self.notifier.success("Control duplicated");
        Ok(copy_id)
    }

    /// Remove a control from the form.
    pub fn delete_control(&mut self, id: ControlId) -> FormResult<Control> {
        let removed = self.mutate(|form| form.remove_control(id))?;
        self.notifier.success("Control deleted");
        Ok(removed)
    }

    /// Apply the result of a configuration dialog for control `id`.
    ///
    /// Returns `Ok(false)` when the dialog was cancelled.
    pub fn apply_dialog(&mut self, id: ControlId, outcome: DialogOutcome) -> FormResult<bool> {
        let control = match outcome {
            DialogOutcome::Cancelled => {
                self.notifier.info("Cancelled");
                return Ok(false);
            }
            DialogOutcome::Configured(control) => control,
        };
        if control.id() != id {
            return Err(FormError::UnknownControl(control.id()));
        }

        self.mutate(|form| form.replace_control(control))?;
        self.notifier.success("Control updated");
        Ok(true)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.update(|form| form.title = title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.update(|form| form.description = description);
    }

    pub fn set_status(&mut self, status: FormStatus) {
        self.update(|form| form.status = status);
    }

    /// Resolve a drag-and-drop gesture and apply it.
    pub fn apply_drop(&mut self, event: &DropEvent) -> FormResult<()> {
        match drop::route(self.form(), event)? {
            DropAction::Insert {
                type_tag,
                options,
                target,
                index,
            } => self.add_control(&type_tag, options, &target, index).map(|_| ()),
            DropAction::Move {
                control_id,
                source,
                target,
                index,
            } => self.move_control(control_id, &source, &target, index).map(|_| ()),
            DropAction::Reorder { container, order } => self.reorder(&container, &order),
        }
    }

    /// Step back to the previous snapshot.
    pub fn undo(&mut self) -> bool {
        if self.history.undo().is_none() {
            return false;
        }
        self.publish();
        true
    }

    /// Re-apply the last undone snapshot.
    pub fn redo(&mut self) -> bool {
        if self.history.redo().is_none() {
            return false;
        }
        self.publish();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Swap in a different form. Undo history starts over.
    pub fn replace_form(&mut self, form: Form) {
        self.last_version = self.last_version.max(form.version);
        self.history.initialize(Snapshot::new(form));
        self.publish();
    }

    /// Save the current form. Returns the key, or `None` if saving failed.
    ///
    /// The saved `updated_at` is also set on the current snapshot, which is
    /// republished. Saving records no undo point.
    pub fn save(&mut self, key: Option<&str>) -> Option<String> {
        let Some(repository) = &self.repository else {
            log::warn!("No repository configured, form not saved");
            self.notifier.error("Form could not be saved");
            return None;
        };

        let mut stamped = self.form().clone();
        stamped.updated_at = Utc::now();

        match repository.write(&stamped, key) {
            Ok(key) => {
                let validation = self.validation().clone();
                self.history.replace_present(Snapshot {
                    form: Arc::new(stamped),
                    validation,
                });
                self.publish();
                self.notifier.success("Form saved");
                Some(key)
            }
            Err(e) => {
                log::error!("Failed to save form: {}", e);
                self.notifier.error("Form could not be saved");
                None
            }
        }
    }

    /// Load the form stored under `key`. On failure the current form stays.
    pub fn load(&mut self, key: &str) -> bool {
        let Some(repository) = &self.repository else {
            log::warn!("No repository configured, cannot load {}", key);
            return false;
        };

        match repository.load(key) {
            Ok(form) => {
                log::info!("Loaded form '{}' from {}", form.title, key);
                self.replace_form(form);
                self.notifier.success("Form loaded");
                true
            }
            Err(e) => {
                log::warn!("Failed to load form {}: {}", key, e);
                self.notifier.error("Form could not be loaded");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{ChoiceOption, ControlKind, Radio, RadioOptions};
    use crate::drop::DropPayload;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, message: &str) {
            self.messages.lock().unwrap().push(format!("success: {}", message));
        }

        fn info(&self, message: &str) {
            self.messages.lock().unwrap().push(format!("info: {}", message));
        }

        fn error(&self, message: &str) {
            self.messages.lock().unwrap().push(format!("error: {}", message));
        }
    }

    fn store() -> FormStore {
        FormStore::new(Form::new("Intake"), EngineConfig::default())
    }

    fn record(store: &mut FormStore) -> Rc<RefCell<Vec<Snapshot>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.clone()));
        seen.borrow_mut().clear();
        seen
    }

    fn add(store: &mut FormStore, tag: &str) -> ControlId {
        store
            .add_control(tag, OptionMap::new(), &ContainerId::Root, usize::MAX)
            .unwrap()
    }

    #[test]
    fn test_subscribe_receives_current_snapshot() {
        let mut store = store();
        let seen = Rc::new(RefCell::new(0));
        let sink = seen.clone();
        store.subscribe(move |_| *sink.borrow_mut() += 1);
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_mutation_publishes_validated_snapshot() {
        let mut store = store();
        let seen = record(&mut store);
        assert!(!store.validation().valid);

        add(&mut store, "TextInput");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].form.control_count(), 1);
        assert!(seen[0].validation.valid, "{:?}", seen[0].validation.errors);
        assert_eq!(seen[0].form.version, 1);
    }

    #[test]
    fn test_failed_mutation_publishes_nothing() {
        let mut store = store();
        let seen = record(&mut store);
        let before = store.snapshot().form.clone();

        let result = store.delete_control(ControlId::new_v4());
        assert!(matches!(result, Err(FormError::UnknownControl(_))));
        assert!(seen.borrow().is_empty());
        assert!(Arc::ptr_eq(&store.snapshot().form, &before));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = store();
        let seen = record(&mut store);
        let id = store.subscribe(|_| {});
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));

        add(&mut store, "TextInput");
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_same_position_move_republishes() {
        let mut store = store();
        let a = add(&mut store, "TextInput");
        add(&mut store, "TextArea");
        let seen = record(&mut store);
        let version = store.form().version;

        let at = store
            .move_control(a, &ContainerId::Root, &ContainerId::Root, 0)
            .unwrap();

        assert_eq!(at, 0);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(store.form().version, version);
    }

    #[test]
    fn test_move_into_column_notifies() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store().with_notifier(notifier.clone());
        let a = add(&mut store, "TextInput");
        let b = add(&mut store, "Columns");

        let target = ContainerId::column(0, b);
        store.move_control(a, &ContainerId::Root, &target, 0).unwrap();

        assert_eq!(store.form().container.ids(), vec![b]);
        assert_eq!(store.form().locate_control(a), Some(target));
        assert_eq!(notifier.messages(), vec!["info: Control moved"]);
    }

    #[test]
    fn test_duplicate_inserted_after_original() {
        let mut store = store();
        let a = add(&mut store, "Radio");
        let b = add(&mut store, "TextInput");

        let copy = store.duplicate_control(a).unwrap();
        assert_eq!(store.form().container.ids(), vec![a, copy, b]);

        let (Some(Control::Radio(original)), Some(Control::Radio(duplicate))) =
            (store.form().find_control(a), store.form().find_control(copy))
        else {
            panic!("expected radios");
        };
        assert_ne!(original.options.group_name, duplicate.options.group_name);
    }

    #[test]
    fn test_duplicate_inside_column() {
        let mut store = store();
        let b = add(&mut store, "Columns");
        let column = ContainerId::column(1, b);
        let inner = store
            .add_control("NumberInput", OptionMap::new(), &column, 0)
            .unwrap();

        let copy = store.duplicate_control(inner).unwrap();
        assert_eq!(store.form().resolve_container(&column).unwrap().ids(), vec![inner, copy]);
        assert_eq!(store.form().control_count(), 3);
    }

    #[test]
    fn test_dialog_outcomes() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store().with_notifier(notifier.clone());
        let id = add(&mut store, "Radio");

        assert!(!store.apply_dialog(id, DialogOutcome::Cancelled).unwrap());

        let Some(Control::Radio(radio)) = store.form().find_control(id).cloned() else {
            panic!("expected radio");
        };
        let configured = Radio {
            title: "Consent".to_string(),
            options: RadioOptions {
                options: vec![ChoiceOption::new("Yes", "yes")],
                ..radio.options.clone()
            },
            ..radio
        };
        let outcome = DialogOutcome::Configured(Control::Radio(configured));
        assert!(store.apply_dialog(id, outcome).unwrap());

        assert_eq!(store.form().find_control(id).unwrap().title(), "Consent");
        assert_eq!(
            notifier.messages(),
            vec!["info: Cancelled", "success: Control updated"]
        );
    }

    #[test]
    fn test_dialog_rejects_other_variant() {
        let mut store = store();
        let id = add(&mut store, "TextInput");
        let mut other = Control::with_defaults(ControlKind::TextArea, "Notes");
        // Same id, different variant
        if let Control::TextArea(area) = &mut other {
            area.id = id;
        }

        let result = store.apply_dialog(id, DialogOutcome::Configured(other));
        assert!(matches!(result, Err(FormError::VariantMismatch { .. })));
    }

    #[test]
    fn test_undo_redo_republish() {
        let mut store = store();
        let a = add(&mut store, "TextInput");
        store.delete_control(a).unwrap();
        let seen = record(&mut store);

        assert!(store.undo());
        assert!(store.form().find_control(a).is_some());
        assert!(store.redo());
        assert!(store.form().find_control(a).is_none());
        assert!(!store.redo());
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = EngineConfig {
            history_limit: 2,
            ..Default::default()
        };
        let mut store = FormStore::new(Form::new("Intake"), config);
        for _ in 0..4 {
            add(&mut store, "TextInput");
        }

        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
        assert_eq!(store.form().control_count(), 2);
    }

    #[test]
    fn test_apply_drop_template_and_reorder() {
        let mut store = store();
        let template = DropEvent {
            source_container_id: ContainerId::Root,
            target_container_id: ContainerId::Root,
            previous_index: 0,
            current_index: 0,
            payload: DropPayload::Template {
                type_tag: "Bogus".to_string(),
                options: OptionMap::new(),
            },
        };
        store.apply_drop(&template).unwrap();
        store.apply_drop(&template).unwrap();
        let ids = store.form().container.ids();
        assert_eq!(store.form().container.get(0).unwrap().kind(), ControlKind::TextInput);

        let reorder = DropEvent {
            previous_index: 0,
            current_index: 1,
            payload: DropPayload::Existing { control_id: ids[0] },
            ..template
        };
        store.apply_drop(&reorder).unwrap();
        assert_eq!(store.form().container.ids(), vec![ids[1], ids[0]]);
    }

    #[test]
    fn test_metadata_setters() {
        let mut store = store();
        store.set_title("Visit");
        store.set_description("Baseline visit");
        store.set_status(FormStatus::Published);

        assert_eq!(store.form().title, "Visit");
        assert_eq!(store.form().description, "Baseline visit");
        assert_eq!(store.form().status, FormStatus::Published);
        assert_eq!(store.form().version, 3);
    }

    #[test]
    fn test_save_and_load() {
        let backend = Arc::new(MemoryStore::new());
        let repository = FormRepository::new(backend.clone());
        let mut store = store().with_repository(repository.clone());
        add(&mut store, "TextInput");

        let key = store.save(Some("intake")).unwrap();
        assert_eq!(key, "intake");
        assert!(backend.contains("ecrf_intake").unwrap());

        let mut other = FormStore::new(Form::new("Other"), EngineConfig::default())
            .with_repository(repository);
        assert!(other.load("intake"));
        assert_eq!(other.form().id, store.form().id);
        assert!(!other.can_undo());
    }

    #[test]
    fn test_load_failure_keeps_state() {
        let backend = Arc::new(MemoryStore::new());
        backend.set("ecrf_broken", "{").unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let mut store = store()
            .with_repository(FormRepository::new(backend))
            .with_notifier(notifier.clone());
        let before = store.snapshot().form.clone();
        let seen = record(&mut store);

        assert!(!store.load("missing-key"));
        assert!(!store.load("broken"));

        assert!(Arc::ptr_eq(&store.snapshot().form, &before));
        assert!(seen.borrow().is_empty());
        assert_eq!(notifier.messages().len(), 2);
    }

    #[test]
    fn test_versions_increase_across_undo() {
        let mut store = store();
        add(&mut store, "TextInput");
        add(&mut store, "Select");
        assert_eq!(store.form().version, 2);

        assert!(store.undo());
        assert_eq!(store.form().version, 1);

        add(&mut store, "Checkbox");
        assert_eq!(store.form().version, 3);
        store.set_title("Visit");
        assert_eq!(store.form().version, 4);
    }

    #[test]
    fn test_setters_record_undo_points() {
        let mut store = store();
        store.set_title("Visit");
        store.set_status(FormStatus::Published);

        assert!(store.undo());
        assert_eq!(store.form().status, FormStatus::Draft);
        assert!(store.undo());
        assert_eq!(store.form().title, "Intake");
    }

    #[test]
    fn test_save_stamps_current_snapshot() {
        let repository = FormRepository::new(Arc::new(MemoryStore::new()));
        let mut store = store().with_repository(repository.clone());
        add(&mut store, "TextInput");
        let version = store.form().version;
        let seen = record(&mut store);

        let key = store.save(None).unwrap();

        assert_eq!(repository.load(&key).unwrap(), *store.form());
        assert_eq!(store.form().version, version);
        assert_eq!(seen.borrow().len(), 1);
        assert!(store.undo());
        assert!(!store.can_undo());
    }

    #[test]
    fn test_save_without_repository() {
        let mut store = store();
        assert_eq!(store.save(None), None);
        assert!(!store.load("anything"));
    }
}

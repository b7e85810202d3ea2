//! Control factory and type registry.
//!
//! The registry is an explicit table from type tag to builder, constructed
//! once and handed to the factory. Options are layered before a builder runs:
//! library defaults first, then the variant's defaults, then whatever the
//! caller supplied. Fields nobody supplied fall back to the serde defaults of
//! the variant's options type.

use crate::controls::{
    Checkbox, Columns, Control, ControlKind, DEFAULT_COLUMN_COUNT, DEFAULT_DATE_FORMAT,
    DEFAULT_STEP_MINUTES, DEFAULT_TEXT_AREA_ROWS, DatePicker, ListBox, MultiSelect, NumberInput,
    Radio, Select, SelectButton, TextArea, TextInput, TimePicker,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Loose option record as carried by toolbox templates and dialogs.
pub type OptionMap = Map<String, Value>;

/// Option key holding a new control's title.
pub const TITLE_KEY: &str = "title";

/// Option key holding the column count of a new layout.
pub const COLUMNS_KEY: &str = "columns";

/// Builder entry for one type tag.
#[derive(Debug, Clone, Copy)]
pub struct ControlBuilder {
    pub kind: ControlKind,
    /// Sparse defaults for this variant, layered over the library defaults.
    pub defaults: fn() -> OptionMap,
    /// Build the control from a title and fully layered options.
    pub build: fn(String, OptionMap) -> Result<Control, serde_json::Error>,
}

/// Mapping from type tag to builder.
#[derive(Debug, Clone)]
pub struct ControlRegistry {
    builders: HashMap<String, ControlBuilder>,
    fallback: ControlBuilder,
}

impl Default for ControlRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ControlRegistry {
    /// Registry with a builder for every built-in variant.
    pub fn with_defaults() -> Self {
        let mut registry = Self {
            builders: HashMap::new(),
            fallback: builtin(ControlKind::TextInput),
        };
        for kind in ControlKind::ALL {
            registry.register(kind.tag(), builtin(kind));
        }
        registry
    }

    /// Register or override the builder for `tag`.
    pub fn register(&mut self, tag: impl Into<String>, builder: ControlBuilder) {
        self.builders.insert(tag.into(), builder);
    }

    /// Builder registered for `tag`.
    pub fn get(&self, tag: &str) -> Option<&ControlBuilder> {
        self.builders.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.builders.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Builder used for unknown tags.
    pub fn fallback(&self) -> &ControlBuilder {
        &self.fallback
    }
}

/// Creates controls from type tags. Nothing else constructs controls for
/// the document.
#[derive(Debug, Clone, Default)]
pub struct ControlFactory {
    registry: ControlRegistry,
    library_defaults: OptionMap,
}

impl ControlFactory {
    /// Create a factory over `registry` with no library defaults.
    pub fn new(registry: ControlRegistry) -> Self {
        Self {
            registry,
            library_defaults: OptionMap::new(),
        }
    }

    /// Set option values applied to every new control unless overridden.
    pub fn with_library_defaults(mut self, defaults: OptionMap) -> Self {
        self.library_defaults = defaults;
        self
    }

    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    /// Build a control for `type_tag`.
    ///
    /// Unknown tags are not an error: a warning is logged and a text input is
    /// built from the same options. When the caller's options do not fit the
    /// variant's shape they are dropped, also with a warning, and the control
    /// is built from the library and variant defaults alone.
    pub fn create_control(&self, type_tag: &str, options: OptionMap) -> Control {
        let builder = match self.registry.get(type_tag) {
            Some(builder) => builder,
            None => {
                log::warn!(
                    "Unknown control type '{}', falling back to {}",
                    type_tag,
                    self.registry.fallback().kind
                );
                self.registry.fallback()
            }
        };

        let mut caller = options;
        let title = caller
            .remove(TITLE_KEY)
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_else(|| builder.kind.display_name().to_string());

        let mut defaults = self.library_defaults.clone();
        defaults.extend((builder.defaults)());
        let mut layered = defaults.clone();
        layered.extend(caller);

        let error = match (builder.build)(title.clone(), layered) {
            Ok(control) => return control,
            Err(e) => e,
        };
        log::warn!(
            "Options for '{}' do not match {} ({}), using defaults",
            type_tag,
            builder.kind,
            error
        );
        match (builder.build)(title.clone(), defaults) {
            Ok(control) => control,
            Err(e) => {
                log::warn!("Defaults for '{}' are invalid ({})", type_tag, e);
                Control::with_defaults(builder.kind, title)
            }
        }
    }

    /// Build a control from a kind, with variant defaults.
    pub fn create_default(&self, kind: ControlKind) -> Control {
        self.create_control(kind.tag(), OptionMap::new())
    }

    /// Copy a control for the "duplicate" action (see `Control::duplicate`).
    pub fn duplicate(&self, control: &Control) -> Control {
        control.duplicate()
    }
}

fn parse<T: DeserializeOwned>(options: OptionMap) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(options))
}

fn sparse(value: Value) -> OptionMap {
    match value {
        Value::Object(map) => map,
        _ => OptionMap::new(),
    }
}

/// Built-in builder for `kind`.
fn builtin(kind: ControlKind) -> ControlBuilder {
    match kind {
        ControlKind::TextInput => ControlBuilder {
            kind,
            defaults: || sparse(json!({ "placeholder": "" })),
            build: |title, options| Ok(Control::TextInput(TextInput::new(title, parse(options)?))),
        },
        ControlKind::TextArea => ControlBuilder {
            kind,
            defaults: || sparse(json!({ "rows": DEFAULT_TEXT_AREA_ROWS })),
            build: |title, options| Ok(Control::TextArea(TextArea::new(title, parse(options)?))),
        },
        ControlKind::Checkbox => ControlBuilder {
            kind,
            defaults: || sparse(json!({ "options": [], "inline": false })),
            build: |title, options| Ok(Control::Checkbox(Checkbox::new(title, parse(options)?))),
        },
        ControlKind::Radio => ControlBuilder {
            kind,
            defaults: || sparse(json!({ "options": [], "inline": true })),
            build: |title, options| Ok(Control::Radio(Radio::new(title, parse(options)?))),
        },
        ControlKind::DatePicker => ControlBuilder {
            kind,
            defaults: || sparse(json!({ "dateFormat": DEFAULT_DATE_FORMAT })),
            build: |title, options| {
                Ok(Control::DatePicker(DatePicker::new(title, parse(options)?)))
            },
        },
        ControlKind::TimePicker => ControlBuilder {
            kind,
            defaults: || {
                sparse(json!({
                    "hourFormat": "24h",
                    "stepMinutes": DEFAULT_STEP_MINUTES,
                }))
            },
            build: |title, options| {
                Ok(Control::TimePicker(TimePicker::new(title, parse(options)?)))
            },
        },
        ControlKind::NumberInput => ControlBuilder {
            kind,
            defaults: || sparse(json!({ "step": 1.0, "decimals": 0 })),
            build: |title, options| {
                Ok(Control::NumberInput(NumberInput::new(title, parse(options)?)))
            },
        },
        ControlKind::Select => ControlBuilder {
            kind,
            defaults: || sparse(json!({ "options": [], "placeholder": "Select..." })),
            build: |title, options| Ok(Control::Select(Select::new(title, parse(options)?))),
        },
        ControlKind::MultiSelect => ControlBuilder {
            kind,
            defaults: || sparse(json!({ "options": [], "placeholder": "Select..." })),
            build: |title, options| {
                Ok(Control::MultiSelect(MultiSelect::new(title, parse(options)?)))
            },
        },
        ControlKind::ListBox => ControlBuilder {
            kind,
            defaults: || sparse(json!({ "options": [], "multiple": false })),
            build: |title, options| Ok(Control::ListBox(ListBox::new(title, parse(options)?))),
        },
        ControlKind::SelectButton => ControlBuilder {
            kind,
            defaults: || sparse(json!({ "options": [], "multiple": false })),
            build: |title, options| {
                Ok(Control::SelectButton(SelectButton::new(title, parse(options)?)))
            },
        },
        ControlKind::Columns => ControlBuilder {
            kind,
            defaults: || {
                let mut defaults = OptionMap::new();
                defaults.insert(COLUMNS_KEY.to_string(), json!(DEFAULT_COLUMN_COUNT));
                defaults
            },
            build: |title, options| {
                let count = match options.get(COLUMNS_KEY) {
                    Some(value) => serde_json::from_value::<usize>(value.clone())?,
                    None => DEFAULT_COLUMN_COUNT,
                };
                Ok(Control::Columns(Columns::new(title, count)))
            },
        },
    }
}

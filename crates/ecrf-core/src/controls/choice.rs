//! Controls that pick from a fixed list of options.

use super::{CommonOptions, ControlId, ControlKind, ControlTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Generate a fresh radio group name.
pub fn generate_group_name() -> String {
    format!("radio-{}", Uuid::new_v4().simple())
}

/// Configuration of a checkbox group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckboxOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub options: Vec<ChoiceOption>,
    /// Lay the boxes out on one line.
    pub inline: bool,
}

/// A group of checkboxes; any subset may be ticked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkbox {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: CheckboxOptions,
    #[serde(default)]
    pub value: Vec<String>,
}

impl Checkbox {
    pub fn new(title: String, options: CheckboxOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: Vec::new(),
        }
    }
}

impl ControlTrait for Checkbox {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::Checkbox
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    fn clear_value(&mut self) {
        self.value.clear();
    }
}

/// Configuration of a radio group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadioOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    /// Shared `name` of the rendered inputs. Must be unique per form.
    pub group_name: String,
    pub options: Vec<ChoiceOption>,
    pub inline: bool,
}

/// A radio group; exactly one option may be chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Radio {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: RadioOptions,
    #[serde(default)]
    pub value: Option<String>,
}

impl Radio {
    /// Create a new radio group. An empty group name is replaced by a generated one.
    pub fn new(title: String, mut options: RadioOptions) -> Self {
        if options.group_name.trim().is_empty() {
            options.group_name = generate_group_name();
        }
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: None,
        }
    }

    /// Give this group a new, unused name.
    pub fn regenerate_group_name(&mut self) {
        self.options.group_name = generate_group_name();
    }
}

impl ControlTrait for Radio {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::Radio
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn has_value(&self) -> bool {
        self.value.is_some()
    }

    fn clear_value(&mut self) {
        self.value = None;
    }
}

/// Configuration of a dropdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub options: Vec<ChoiceOption>,
    pub placeholder: String,
    /// Offer a search box above the list.
    pub filterable: bool,
}

/// A single-choice dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: SelectOptions,
    #[serde(default)]
    pub value: Option<String>,
}

impl Select {
    pub fn new(title: String, options: SelectOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: None,
        }
    }
}

impl ControlTrait for Select {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::Select
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn has_value(&self) -> bool {
        self.value.is_some()
    }

    fn clear_value(&mut self) {
        self.value = None;
    }
}

/// Configuration of a multi-choice dropdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MultiSelectOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub options: Vec<ChoiceOption>,
    pub placeholder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_selected: Option<usize>,
}

/// A dropdown where several options may be chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiSelect {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: MultiSelectOptions,
    #[serde(default)]
    pub value: Vec<String>,
}

impl MultiSelect {
    pub fn new(title: String, options: MultiSelectOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: Vec::new(),
        }
    }
}

impl ControlTrait for MultiSelect {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::MultiSelect
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    fn clear_value(&mut self) {
        self.value.clear();
    }
}

/// Configuration of a list box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListBoxOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub options: Vec<ChoiceOption>,
    /// Allow more than one selected entry.
    pub multiple: bool,
}

/// An always-open scrollable list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListBox {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: ListBoxOptions,
    #[serde(default)]
    pub value: Vec<String>,
}

impl ListBox {
    pub fn new(title: String, options: ListBoxOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: Vec::new(),
        }
    }
}

impl ControlTrait for ListBox {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::ListBox
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    fn clear_value(&mut self) {
        self.value.clear();
    }
}

/// Configuration of a row of toggle buttons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectButtonOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub options: Vec<ChoiceOption>,
    pub multiple: bool,
}

/// A row of toggle buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectButton {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: SelectButtonOptions,
    #[serde(default)]
    pub value: Vec<String>,
}

impl SelectButton {
    pub fn new(title: String, options: SelectButtonOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: Vec::new(),
        }
    }
}

impl ControlTrait for SelectButton {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::SelectButton
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    fn clear_value(&mut self) {
        self.value.clear();
    }
}

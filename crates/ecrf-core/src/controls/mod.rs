//! Control definitions for the form document.

mod choice;
mod columns;
mod number;
mod temporal;
mod text;

pub use choice::{
    Checkbox, CheckboxOptions, ChoiceOption, ListBox, ListBoxOptions, MultiSelect,
    MultiSelectOptions, Radio, RadioOptions, Select, SelectButton, SelectButtonOptions,
    SelectOptions, generate_group_name,
};
pub use columns::{Column, Columns, DEFAULT_COLUMN_COUNT, MAX_COLUMN_COUNT};
pub use number::{NumberInput, NumberInputOptions};
pub use temporal::{
    DEFAULT_DATE_FORMAT, DEFAULT_STEP_MINUTES, DatePicker, DatePickerOptions, HourFormat,
    TimePicker, TimePickerOptions,
};
pub use text::{DEFAULT_TEXT_AREA_ROWS, TextArea, TextAreaOptions, TextInput, TextInputOptions};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for controls.
pub type ControlId = Uuid;

/// Options shared by every field variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommonOptions {
    /// The respondent must supply a value.
    pub required: bool,
    /// Rendered read-only.
    pub disabled: bool,
    /// Hint shown under the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Discriminator for the closed set of control variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    TextInput,
    TextArea,
    Checkbox,
    Radio,
    DatePicker,
    TimePicker,
    NumberInput,
    Select,
    MultiSelect,
    ListBox,
    SelectButton,
    Columns,
}

impl ControlKind {
    /// Every variant, in toolbox order.
    pub const ALL: [ControlKind; 12] = [
        ControlKind::TextInput,
        ControlKind::TextArea,
        ControlKind::Checkbox,
        ControlKind::Radio,
        ControlKind::DatePicker,
        ControlKind::TimePicker,
        ControlKind::NumberInput,
        ControlKind::Select,
        ControlKind::MultiSelect,
        ControlKind::ListBox,
        ControlKind::SelectButton,
        ControlKind::Columns,
    ];

    /// The type tag used in persisted documents and toolbox templates.
    pub fn tag(&self) -> &'static str {
        match self {
            ControlKind::TextInput => "TextInput",
            ControlKind::TextArea => "TextArea",
            ControlKind::Checkbox => "Checkbox",
            ControlKind::Radio => "Radio",
            ControlKind::DatePicker => "DatePicker",
            ControlKind::TimePicker => "TimePicker",
            ControlKind::NumberInput => "NumberInput",
            ControlKind::Select => "Select",
            ControlKind::MultiSelect => "MultiSelect",
            ControlKind::ListBox => "ListBox",
            ControlKind::SelectButton => "SelectButton",
            ControlKind::Columns => "Columns",
        }
    }

    /// Look up a kind by its exact type tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Human readable name, used for labels and error paths.
    pub fn display_name(&self) -> &'static str {
        match self {
            ControlKind::TextInput => "Text Input",
            ControlKind::TextArea => "Text Area",
            ControlKind::Checkbox => "Checkbox",
            ControlKind::Radio => "Radio",
            ControlKind::DatePicker => "Date Picker",
            ControlKind::TimePicker => "Time Picker",
            ControlKind::NumberInput => "Number Input",
            ControlKind::Select => "Select",
            ControlKind::MultiSelect => "Multi Select",
            ControlKind::ListBox => "List Box",
            ControlKind::SelectButton => "Select Button",
            ControlKind::Columns => "Columns",
        }
    }

    /// Short toolbox description. Presentation only.
    pub fn description(&self) -> &'static str {
        match self {
            ControlKind::TextInput => "Single line of free text",
            ControlKind::TextArea => "Multiple lines of free text",
            ControlKind::Checkbox => "Any number of choices from a list",
            ControlKind::Radio => "Exactly one choice from a list",
            ControlKind::DatePicker => "Calendar date",
            ControlKind::TimePicker => "Time of day",
            ControlKind::NumberInput => "Numeric value with optional bounds",
            ControlKind::Select => "Dropdown with a single choice",
            ControlKind::MultiSelect => "Dropdown with several choices",
            ControlKind::ListBox => "Scrollable list of choices",
            ControlKind::SelectButton => "Row of toggle buttons",
            ControlKind::Columns => "Side by side layout columns",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Common trait for all controls.
pub trait ControlTrait {
    /// Get the unique identifier.
    fn id(&self) -> ControlId;

    /// Get the variant discriminator.
    fn kind(&self) -> ControlKind;

    /// Get the title shown above the field.
    fn title(&self) -> &str;

    /// Whether a respondent value is currently stored.
    fn has_value(&self) -> bool;

    /// Reset the value to the variant's empty state.
    fn clear_value(&mut self);
}

/// Enum wrapper for all control types (for serialization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Control {
    TextInput(TextInput),
    TextArea(TextArea),
    Checkbox(Checkbox),
    Radio(Radio),
    DatePicker(DatePicker),
    TimePicker(TimePicker),
    NumberInput(NumberInput),
    Select(Select),
    MultiSelect(MultiSelect),
    ListBox(ListBox),
    SelectButton(SelectButton),
    Columns(Columns),
}

impl Control {
    /// Build a control of the given kind with variant defaults.
    pub fn with_defaults(kind: ControlKind, title: impl Into<String>) -> Self {
        let title = title.into();
        match kind {
            ControlKind::TextInput => Control::TextInput(TextInput::new(title, Default::default())),
            ControlKind::TextArea => Control::TextArea(TextArea::new(title, Default::default())),
            ControlKind::Checkbox => Control::Checkbox(Checkbox::new(title, Default::default())),
            ControlKind::Radio => Control::Radio(Radio::new(title, Default::default())),
            ControlKind::DatePicker => {
                Control::DatePicker(DatePicker::new(title, Default::default()))
            }
            ControlKind::TimePicker => {
                Control::TimePicker(TimePicker::new(title, Default::default()))
            }
            ControlKind::NumberInput => {
                Control::NumberInput(NumberInput::new(title, Default::default()))
            }
            ControlKind::Select => Control::Select(Select::new(title, Default::default())),
            ControlKind::MultiSelect => {
                Control::MultiSelect(MultiSelect::new(title, Default::default()))
            }
            ControlKind::ListBox => Control::ListBox(ListBox::new(title, Default::default())),
            ControlKind::SelectButton => {
                Control::SelectButton(SelectButton::new(title, Default::default()))
            }
            ControlKind::Columns => Control::Columns(Columns::new(title, DEFAULT_COLUMN_COUNT)),
        }
    }

    pub fn id(&self) -> ControlId {
        match self {
            Control::TextInput(c) => c.id(),
            Control::TextArea(c) => c.id(),
            Control::Checkbox(c) => c.id(),
            Control::Radio(c) => c.id(),
            Control::DatePicker(c) => c.id(),
            Control::TimePicker(c) => c.id(),
            Control::NumberInput(c) => c.id(),
            Control::Select(c) => c.id(),
            Control::MultiSelect(c) => c.id(),
            Control::ListBox(c) => c.id(),
            Control::SelectButton(c) => c.id(),
            Control::Columns(c) => c.id(),
        }
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            Control::TextInput(c) => c.kind(),
            Control::TextArea(c) => c.kind(),
            Control::Checkbox(c) => c.kind(),
            Control::Radio(c) => c.kind(),
            Control::DatePicker(c) => c.kind(),
            Control::TimePicker(c) => c.kind(),
            Control::NumberInput(c) => c.kind(),
            Control::Select(c) => c.kind(),
            Control::MultiSelect(c) => c.kind(),
            Control::ListBox(c) => c.kind(),
            Control::SelectButton(c) => c.kind(),
            Control::Columns(c) => c.kind(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Control::TextInput(c) => c.title(),
            Control::TextArea(c) => c.title(),
            Control::Checkbox(c) => c.title(),
            Control::Radio(c) => c.title(),
            Control::DatePicker(c) => c.title(),
            Control::TimePicker(c) => c.title(),
            Control::NumberInput(c) => c.title(),
            Control::Select(c) => c.title(),
            Control::MultiSelect(c) => c.title(),
            Control::ListBox(c) => c.title(),
            Control::SelectButton(c) => c.title(),
            Control::Columns(c) => c.title(),
        }
    }

    pub fn has_value(&self) -> bool {
        match self {
            Control::TextInput(c) => c.has_value(),
            Control::TextArea(c) => c.has_value(),
            Control::Checkbox(c) => c.has_value(),
            Control::Radio(c) => c.has_value(),
            Control::DatePicker(c) => c.has_value(),
            Control::TimePicker(c) => c.has_value(),
            Control::NumberInput(c) => c.has_value(),
            Control::Select(c) => c.has_value(),
            Control::MultiSelect(c) => c.has_value(),
            Control::ListBox(c) => c.has_value(),
            Control::SelectButton(c) => c.has_value(),
            Control::Columns(c) => c.has_value(),
        }
    }

    pub fn clear_value(&mut self) {
        match self {
            Control::TextInput(c) => c.clear_value(),
            Control::TextArea(c) => c.clear_value(),
            Control::Checkbox(c) => c.clear_value(),
            Control::Radio(c) => c.clear_value(),
            Control::DatePicker(c) => c.clear_value(),
            Control::TimePicker(c) => c.clear_value(),
            Control::NumberInput(c) => c.clear_value(),
            Control::Select(c) => c.clear_value(),
            Control::MultiSelect(c) => c.clear_value(),
            Control::ListBox(c) => c.clear_value(),
            Control::SelectButton(c) => c.clear_value(),
            Control::Columns(c) => c.clear_value(),
        }
    }

    /// Label used in messages: the title, or the variant name when untitled.
    pub fn label(&self) -> &str {
        let title = self.title().trim();
        if title.is_empty() {
            self.kind().display_name()
        } else {
            title
        }
    }

    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        match self {
            Control::TextInput(c) => c.title = title,
            Control::TextArea(c) => c.title = title,
            Control::Checkbox(c) => c.title = title,
            Control::Radio(c) => c.title = title,
            Control::DatePicker(c) => c.title = title,
            Control::TimePicker(c) => c.title = title,
            Control::NumberInput(c) => c.title = title,
            Control::Select(c) => c.title = title,
            Control::MultiSelect(c) => c.title = title,
            Control::ListBox(c) => c.title = title,
            Control::SelectButton(c) => c.title = title,
            Control::Columns(c) => c.title = title,
        }
    }

    /// Regenerate the control's ID with a new unique identifier.
    /// Nested controls of a columns layout keep their IDs.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Control::TextInput(c) => c.id = new_id,
            Control::TextArea(c) => c.id = new_id,
            Control::Checkbox(c) => c.id = new_id,
            Control::Radio(c) => c.id = new_id,
            Control::DatePicker(c) => c.id = new_id,
            Control::TimePicker(c) => c.id = new_id,
            Control::NumberInput(c) => c.id = new_id,
            Control::Select(c) => c.id = new_id,
            Control::MultiSelect(c) => c.id = new_id,
            Control::ListBox(c) => c.id = new_id,
            Control::SelectButton(c) => c.id = new_id,
            Control::Columns(c) => c.id = new_id,
        }
    }

    /// Copy this control for the "duplicate" action.
    ///
    /// The copy gets a fresh id and an empty value. Radios get a new group
    /// name so the two groups never share selection. Columns are copied
    /// deeply, with every nested control duplicated the same way.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.regenerate_id();
        copy.clear_value();
        match &mut copy {
            Control::Radio(radio) => radio.regenerate_group_name(),
            Control::Columns(columns) => columns.duplicate_children(),
            _ => {}
        }
        copy
    }

    /// Choice list for the option-based variants.
    pub fn choices(&self) -> Option<&[ChoiceOption]> {
        match self {
            Control::Checkbox(c) => Some(&c.options.options),
            Control::Radio(c) => Some(&c.options.options),
            Control::Select(c) => Some(&c.options.options),
            Control::MultiSelect(c) => Some(&c.options.options),
            Control::ListBox(c) => Some(&c.options.options),
            Control::SelectButton(c) => Some(&c.options.options),
            _ => None,
        }
    }

    /// Options shared by all field variants. Columns have none.
    pub fn common(&self) -> Option<&CommonOptions> {
        match self {
            Control::TextInput(c) => Some(&c.options.common),
            Control::TextArea(c) => Some(&c.options.common),
            Control::Checkbox(c) => Some(&c.options.common),
            Control::Radio(c) => Some(&c.options.common),
            Control::DatePicker(c) => Some(&c.options.common),
            Control::TimePicker(c) => Some(&c.options.common),
            Control::NumberInput(c) => Some(&c.options.common),
            Control::Select(c) => Some(&c.options.common),
            Control::MultiSelect(c) => Some(&c.options.common),
            Control::ListBox(c) => Some(&c.options.common),
            Control::SelectButton(c) => Some(&c.options.common),
            Control::Columns(_) => None,
        }
    }

    /// Check if this control is a columns layout.
    pub fn is_columns(&self) -> bool {
        matches!(self, Control::Columns(_))
    }

    /// Get the columns layout if this control is one.
    pub fn as_columns(&self) -> Option<&Columns> {
        match self {
            Control::Columns(c) => Some(c),
            _ => None,
        }
    }

    /// Get the mutable columns layout if this control is one.
    pub fn as_columns_mut(&mut self) -> Option<&mut Columns> {
        match self {
            Control::Columns(c) => Some(c),
            _ => None,
        }
    }

    /// Depth of columns nesting this control introduces (0 for fields).
    pub fn columns_depth(&self) -> usize {
        match self {
            Control::Columns(c) => c.nesting_depth(),
            _ => 0,
        }
    }

    /// This control's id followed by every nested control id, depth-first.
    pub fn all_ids(&self) -> Vec<ControlId> {
        let mut ids = vec![self.id()];
        if let Control::Columns(columns) = self {
            for container in columns.containers() {
                for child in container.iter() {
                    ids.extend(child.all_ids());
                }
            }
        }
        ids
    }
}

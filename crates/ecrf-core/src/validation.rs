//! Structural validation of a form.
//!
//! Validation is read-only and never fails. Every finding is collected into a
//! [`ValidationReport`] with a readable path such as
//! `Form > Layout > Column 2 > Age: ...`.

use crate::container::Container;
use crate::controls::{ChoiceOption, Columns, Control, ControlId};
use crate::form::Form;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Message for a form without a title.
pub const MISSING_TITLE: &str = "Form must have a title";

/// Message for a form whose root container is empty.
pub const EMPTY_FORM: &str = "Form must have at least one control";

const ROOT_SEGMENT: &str = "Form";

/// Outcome of validating a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate `form`, accumulating every finding.
pub fn validate(form: &Form) -> ValidationReport {
    let mut walker = Walker::default();

    if form.title.trim().is_empty() {
        walker.errors.push(MISSING_TITLE.to_string());
    }
    if form.container.is_empty() {
        walker.errors.push(EMPTY_FORM.to_string());
    }

    let mut path = vec![ROOT_SEGMENT.to_string()];
    walker.container(&form.container, &mut path);

    ValidationReport::from_errors(walker.errors)
}

#[derive(Default)]
struct Walker {
    errors: Vec<String>,
    seen: HashSet<ControlId>,
}

impl Walker {
    fn report(&mut self, path: &[String], message: impl AsRef<str>) {
        self.errors
            .push(format!("{}: {}", path.join(" > "), message.as_ref()));
    }

    fn container(&mut self, container: &Container, path: &mut Vec<String>) {
        for control in container.iter() {
            path.push(control.label().to_string());
            self.control(control, path);
            path.pop();
        }
    }

    fn control(&mut self, control: &Control, path: &mut Vec<String>) {
        if !self.seen.insert(control.id()) {
            self.report(path, format!("Duplicate control id {}", control.id()));
        }

        if let Some(options) = control.choices() {
            self.choices(options, path);
        }

        match control {
            Control::TextInput(c) => {
                if c.title.trim().is_empty() {
                    self.report(path, "Text input must have a title");
                }
                if let (Some(min), Some(max)) = (c.options.min_length, c.options.max_length) {
                    if min > max {
                        self.report(path, "Minimum length exceeds maximum length");
                    }
                }
            }
            Control::TextArea(c) => {
                if c.title.trim().is_empty() {
                    self.report(path, "Text area must have a title");
                }
            }
            Control::Checkbox(c) => self.values(&c.value, &c.options.options, path),
            Control::Radio(c) => {
                if c.options.group_name.trim().is_empty() {
                    self.report(path, "Radio must have a group name");
                }
                self.values(c.value.as_slice(), &c.options.options, path);
            }
            Control::DatePicker(c) => {
                let (min, max) = (c.options.min_date, c.options.max_date);
                if let (Some(min), Some(max)) = (min, max) {
                    if min > max {
                        self.report(path, "Minimum date is after maximum date");
                    }
                }
                if let Some(value) = c.value {
                    if min.is_some_and(|min| value < min) || max.is_some_and(|max| value > max) {
                        self.report(path, format!("Date {} is out of range", value));
                    }
                }
            }
            Control::TimePicker(_) => {}
            Control::NumberInput(c) => {
                if let (Some(min), Some(max)) = (c.options.min, c.options.max) {
                    if min > max {
                        self.report(path, "Minimum exceeds maximum");
                    }
                }
                match c.value {
                    Some(value) if !c.options.accepts(value) => {
                        self.report(path, format!("Value {} is out of range", value))
                    }
                    _ => {}
                }
            }
            Control::Select(c) => self.values(c.value.as_slice(), &c.options.options, path),
            Control::MultiSelect(c) => {
                match c.options.max_selected {
                    Some(max) if c.value.len() > max => self.report(
                        path,
                        format!("At most {} values may be selected, found {}", max, c.value.len()),
                    ),
                    _ => {}
                }
                self.values(&c.value, &c.options.options, path);
            }
            Control::ListBox(c) => self.values(&c.value, &c.options.options, path),
            Control::SelectButton(c) => self.values(&c.value, &c.options.options, path),
            Control::Columns(c) => self.columns(c, path),
        }
    }

    fn columns(&mut self, columns: &Columns, path: &mut Vec<String>) {
        if columns.column_count() == 0 {
            self.report(path, "Columns must have at least one column");
        }

        for (index, column) in columns.columns().iter().enumerate() {
            path.push(format!("Column {}", index + 1));
            match &column.container {
                Some(container) => self.container(container, path),
                None => self.report(path, "Column has no container"),
            }
            path.pop();
        }
    }

    fn choices(&mut self, options: &[ChoiceOption], path: &[String]) {
        if options.is_empty() {
            self.report(path, "At least one option is required");
            return;
        }

        let mut values = HashSet::new();
        for option in options {
            if !values.insert(option.value.as_str()) {
                self.report(path, format!("Duplicate option value '{}'", option.value));
            }
        }
    }

    fn values(&mut self, selected: &[String], options: &[ChoiceOption], path: &[String]) {
        for value in selected {
            if !options.iter().any(|option| &option.value == value) {
                self.report(path, format!("Value '{}' is not one of the options", value));
            }
        }
    }
}

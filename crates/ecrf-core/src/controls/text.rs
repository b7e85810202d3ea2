//! Free text controls.

use super::{CommonOptions, ControlId, ControlKind, ControlTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visible rows of a new text area.
pub const DEFAULT_TEXT_AREA_ROWS: u32 = 4;

/// Configuration of a single-line text input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextInputOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub placeholder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression the answer must match, checked by the renderer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// A single-line text input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInput {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: TextInputOptions,
    #[serde(default)]
    pub value: Option<String>,
}

impl TextInput {
    /// Create a new text input.
    pub fn new(title: String, options: TextInputOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: None,
        }
    }
}

impl ControlTrait for TextInput {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::TextInput
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }

    fn clear_value(&mut self) {
        self.value = None;
    }
}

/// Configuration of a multi-line text area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextAreaOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub placeholder: String,
    pub rows: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl Default for TextAreaOptions {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            placeholder: String::new(),
            rows: DEFAULT_TEXT_AREA_ROWS,
            max_length: None,
        }
    }
}

/// A multi-line text area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextArea {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: TextAreaOptions,
    #[serde(default)]
    pub value: Option<String>,
}

impl TextArea {
    /// Create a new text area.
    pub fn new(title: String, options: TextAreaOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: None,
        }
    }
}

impl ControlTrait for TextArea {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::TextArea
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }

    fn clear_value(&mut self) {
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_area_defaults_fill_missing_fields() {
        let options: TextAreaOptions = serde_json::from_str(r#"{"placeholder":"Notes"}"#).unwrap();
        assert_eq!(options.placeholder, "Notes");
        assert_eq!(options.rows, DEFAULT_TEXT_AREA_ROWS);
        assert!(!options.common.required);
    }

    #[test]
    fn test_common_options_are_flattened() {
        let options: TextInputOptions =
            serde_json::from_str(r#"{"required":true,"maxLength":20}"#).unwrap();
        assert!(options.common.required);
        assert_eq!(options.max_length, Some(20));

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["required"], true);
        assert!(json.get("common").is_none());
    }

    #[test]
    fn test_empty_string_is_not_a_value() {
        let mut input = TextInput::new("Name".to_string(), TextInputOptions::default());
        input.value = Some(String::new());
        assert!(!input.has_value());
        input.value = Some("x".to_string());
        assert!(input.has_value());
    }
}

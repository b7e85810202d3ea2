//! Numeric input control.

use super::{CommonOptions, ControlId, ControlKind, ControlTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Configuration of a number input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberInputOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub step: f64,
    /// Digits shown after the decimal point.
    pub decimals: u32,
    /// Unit label rendered next to the field, e.g. "kg".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Default for NumberInputOptions {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            min: None,
            max: None,
            step: 1.0,
            decimals: 0,
            unit: None,
        }
    }
}

impl NumberInputOptions {
    /// Check whether a value lies within the configured bounds.
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite()
            && self.min.is_none_or(|min| value >= min)
            && self.max.is_none_or(|max| value <= max)
    }
}

/// A numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberInput {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: NumberInputOptions,
    #[serde(default)]
    pub value: Option<f64>,
}

impl NumberInput {
    pub fn new(title: String, options: NumberInputOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: None,
        }
    }
}

impl ControlTrait for NumberInput {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::NumberInput
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

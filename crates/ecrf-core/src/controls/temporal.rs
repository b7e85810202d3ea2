//! Date and time controls.

use super::{CommonOptions, ControlId, ControlKind, ControlTrait};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display format of a new date picker (chrono syntax).
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Minute granularity of a new time picker.
pub const DEFAULT_STEP_MINUTES: u32 = 15;

/// Configuration of a date picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatePickerOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub date_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date: Option<NaiveDate>,
}

impl Default for DatePickerOptions {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            min_date: None,
            max_date: None,
        }
    }
}

/// A calendar date field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatePicker {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: DatePickerOptions,
    #[serde(default)]
    pub value: Option<NaiveDate>,
}

impl DatePicker {
    pub fn new(title: String, options: DatePickerOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: None,
        }
    }
}

impl ControlTrait for DatePicker {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::DatePicker
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

/// Clock style of a time picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HourFormat {
    #[serde(rename = "12h")]
    Twelve,
    #[default]
    #[serde(rename = "24h")]
    TwentyFour,
}

/// Configuration of a time picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimePickerOptions {
    #[serde(flatten)]
    pub common: CommonOptions,
    pub hour_format: HourFormat,
    pub step_minutes: u32,
}

impl Default for TimePickerOptions {
    fn default() -> Self {
        Self {
            common: CommonOptions::default(),
            hour_format: HourFormat::default(),
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }
}

/// A time-of-day field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePicker {
    pub(crate) id: ControlId,
    pub title: String,
    #[serde(default)]
    pub options: TimePickerOptions,
    #[serde(default)]
    pub value: Option<NaiveTime>,
}

impl TimePicker {
    pub fn new(title: String, options: TimePickerOptions) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            options,
            value: None,
        }
    }
}

impl ControlTrait for TimePicker {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::TimePicker
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_bounds_parse_from_iso_strings() {
        let options: DatePickerOptions =
            serde_json::from_str(r#"{"minDate":"2024-01-01","maxDate":"2024-12-31"}"#).unwrap();
        assert_eq!(options.min_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(options.max_date, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(options.date_format, DEFAULT_DATE_FORMAT);
    }

    #[test]
    fn test_hour_format_names() {
        let options: TimePickerOptions = serde_json::from_str(r#"{"hourFormat":"12h"}"#).unwrap();
        assert_eq!(options.hour_format, HourFormat::Twelve);
        assert_eq!(options.step_minutes, DEFAULT_STEP_MINUTES);
    }
}

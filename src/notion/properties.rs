//! Notion property encodings and the coercions that produce them.
//!
//! Each [`PropertyValue`] serializes to the JSON shape the pages API expects
//! for that property type, e.g. `{"checkbox": true}` or `{"select": null}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Notion caps a single rich text object at 2000 UTF-16 code units.
pub const MAX_TEXT_LEN: usize = 2000;

/// Property types a form field can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Title,
    RichText,
    Email,
    #[serde(alias = "phone_number")]
    Phone,
    Number,
    Select,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Title(Vec<RichText>),
    RichText(Vec<RichText>),
    Email(String),
    PhoneNumber(String),
    Number(Option<Number>),
    Select(Option<SelectOption>),
    Checkbox(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    Text { text: TextContent },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub name: String,
}

/// Target property name to encoded value, as sent in `properties`.
pub type RecordProperties = BTreeMap<String, PropertyValue>;

impl PropertyKind {
    /// Encode an optional input value as this kind of property.
    pub fn encode(self, value: Option<&Value>) -> PropertyValue {
        match self {
            PropertyKind::Title => PropertyValue::Title(text_run(value)),
            PropertyKind::RichText => PropertyValue::RichText(text_run(value)),
            PropertyKind::Email => PropertyValue::Email(value.map(stringify).unwrap_or_default()),
            PropertyKind::Phone => {
                PropertyValue::PhoneNumber(value.map(stringify).unwrap_or_default())
            }
            PropertyKind::Number => PropertyValue::Number(value.and_then(number)),
            PropertyKind::Select => PropertyValue::Select(value.and_then(select)),
            PropertyKind::Checkbox => PropertyValue::Checkbox(value.is_some_and(checkbox)),
        }
    }
}

fn text_run(value: Option<&Value>) -> Vec<RichText> {
    let content = value.map(stringify).unwrap_or_default();
    vec![RichText::Text {
        text: TextContent {
            content: truncate(&content, MAX_TEXT_LEN),
        },
    }]
}

/// Longest prefix of `s` that fits in `max` UTF-16 code units. A character
/// that would straddle the limit is dropped whole.
pub fn truncate(s: &str, max: usize) -> String {
    let mut units = 0;
    for (idx, c) in s.char_indices() {
        units += c.len_utf16();
        if units > max {
            return s[..idx].to_string();
        }
    }
    s.to_string()
}

/// Render a scalar as text. Strings are taken as-is, not JSON-quoted.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse a numeric input. Non-finite or unparsable input gives `None`.
pub fn number(value: &Value) -> Option<Number> {
    let n = match value {
        Value::Number(n) => return Some(n.clone()),
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !n.is_finite() {
        return None;
    }
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Some(Number::from(n as i64));
    }
    Number::from_f64(n)
}

/// `false`, zero and empty strings leave the select unset.
fn select(value: &Value) -> Option<SelectOption> {
    match value {
        Value::Bool(false) => return None,
        Value::Number(n) if n.as_f64() == Some(0.0) => return None,
        _ => {}
    }
    let name = stringify(value);
    if name.is_empty() {
        return None;
    }
    Some(SelectOption { name })
}

/// Only `true` or a case-insensitive `"true"` checks the box.
pub fn checkbox(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

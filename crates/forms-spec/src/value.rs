use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current form values keyed by field id.
pub type FormData = BTreeMap<String, FieldValue>;

static NULL: FieldValue = FieldValue::Null;

/// Closed value type flowing through the evaluators.
///
/// `Null` covers both JSON `null` and a field that has no value yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Numeric coercion used by range rules and comparison operators.
    pub fn to_number(&self) -> f64 {
        match self {
            FieldValue::Null => f64::NAN,
            FieldValue::Bool(flag) => {
                if *flag {
                    1.0
                } else {
                    0.0
                }
            }
            FieldValue::Number(number) => *number,
            FieldValue::Text(text) => parse_number(text),
            FieldValue::List(items) => match items.as_slice() {
                [] => 0.0,
                [single] => parse_number(&single.to_text()),
                _ => f64::NAN,
            },
        }
    }

    /// Text coercion used by length, pattern and `contains` checks.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(flag) => flag.to_string(),
            FieldValue::Number(number) => format_number(*number),
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::to_text)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(flag) => *flag,
            FieldValue::Number(number) => *number != 0.0 && !number.is_nan(),
            FieldValue::Text(text) => !text.is_empty(),
            FieldValue::List(_) => true,
        }
    }

    /// `Null`, the empty string and the empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    /// Values that optional rules ignore: empty or falsy.
    pub fn is_blank(&self) -> bool {
        self.is_empty() || !self.is_truthy()
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(flag) => FieldValue::Bool(*flag),
            Value::Number(number) => number
                .as_f64()
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Null),
            Value::String(text) => FieldValue::Text(text.clone()),
            Value::Array(items) => FieldValue::List(items.iter().map(FieldValue::from).collect()),
            Value::Object(_) => FieldValue::Text(value.to_string()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::from(&value)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<f64> for FieldValue {
    fn from(number: f64) -> Self {
        FieldValue::Number(number)
    }
}

impl From<i64> for FieldValue {
    fn from(number: i64) -> Self {
        FieldValue::Number(number as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(flag: bool) -> Self {
        FieldValue::Bool(flag)
    }
}

/// Reads a field from form data; missing ids read as `Null`.
pub fn value_of<'a>(data: &'a FormData, field_id: &str) -> &'a FieldValue {
    data.get(field_id).unwrap_or(&NULL)
}

/// Builds form data from a JSON object. Non-object input yields empty data.
pub fn form_data_from_json(value: &Value) -> FormData {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(key, value)| (key.clone(), FieldValue::from(value)))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(number) = parse_prefixed(trimmed) {
        return number;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().any(char::is_alphabetic) && !is_exponent_form(trimmed) => f64::NAN,
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}

// Unsigned `0x`, `0o` and `0b` integer literals; `None` when unprefixed.
fn parse_prefixed(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let number = digits.chars().try_fold(0.0_f64, |acc, ch| {
        ch.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    });
    Some(number.unwrap_or(f64::NAN))
}

// `1e3` style literals are the only alphabetic input `Number()` accepts.
fn is_exponent_form(text: &str) -> bool {
    text.chars()
        .filter(|ch| ch.is_alphabetic())
        .all(|ch| ch == 'e' || ch == 'E')
}

fn format_number(number: f64) -> String {
    if number.is_nan() {
        "NaN".into()
    } else if number.is_infinite() {
        if number > 0.0 {
            "Infinity".into()
        } else {
            "-Infinity".into()
        }
    } else {
        number.to_string()
    }
}

//! Typed leaf values and how they are displayed and exported.

use crate::Result;
use crate::resource::text::Text;
use crate::resource::units;

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde_json::{Number, Value as Json};

/// Value-to-label table for numbers and enums.
pub type Lookup<T> = &'static [(T, &'static str)];

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String {
        value: String,
        /// Rendered instead of `value` when present.
        display: Option<Text>,
    },
    Bool(bool),
    Date(DateTime<Utc>),
    Int {
        value: i64,
        lookup: Option<Lookup<i64>>,
    },
    UInt {
        value: u64,
        lookup: Option<Lookup<u64>>,
    },
    Float(f64),
    Bytes(u64),
    Frequency(u64),
    Enum {
        name: String,
        ordinal: u32,
        lookup: Option<Lookup<&'static str>>,
    },
    IntArray {
        values: Vec<i64>,
        lookup: Option<Lookup<i64>>,
    },
    FloatArray(Vec<f64>),
    StringArray(Vec<String>),
}

impl Value {
    /// A string rendered through the catalog; exported as an empty string.
    pub fn text(text: Text) -> Self {
        Value::String {
            value: String::new(),
            display: Some(text),
        }
    }

    pub fn bytes(bytes: u64) -> Self {
        Value::Bytes(bytes)
    }

    pub fn frequency(hz: u64) -> Self {
        Value::Frequency(hz)
    }

    pub fn enumeration(
        name: impl Into<String>,
        ordinal: u32,
        lookup: Lookup<&'static str>,
    ) -> Self {
        Value::Enum {
            name: name.into(),
            ordinal,
            lookup: Some(lookup),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Value::String { value, display } => match display {
                Some(text) => text.render(),
                None => value.clone(),
            },
            Value::Bool(true) => Text::key("yes").render(),
            Value::Bool(false) => Text::key("no").render(),
            Value::Date(date) => date.format("%Y/%m/%d %H:%M:%S").to_string(),
            Value::Int { value, lookup } => lookup_number(*value, *lookup),
            Value::UInt { value, lookup } => lookup_number(*value, *lookup),
            Value::Float(v) => v.to_string(),
            Value::Bytes(b) => format!("{} ({})", units::bytes_si(*b), units::bytes_binary(*b)),
            Value::Frequency(hz) => units::frequency(*hz),
            Value::Enum {
                name,
                ordinal,
                lookup,
            } => match lookup {
                Some(table) => match table.iter().find(|(k, _)| *k == name.as_str()) {
                    Some((_, label)) => label.to_string(),
                    None => {
                        Text::key_with("unknown_value_enum", [name.clone(), ordinal.to_string()])
                            .render()
                    }
                },
                None => name.clone(),
            },
            Value::IntArray { values, lookup } => {
                join_or_empty(values.iter().map(|v| match lookup {
                    Some(_) => lookup_number(*v, *lookup),
                    None => v.to_string(),
                }))
            }
            Value::FloatArray(values) => join_or_empty(values.iter().map(|v| v.to_string())),
            Value::StringArray(values) => join_or_empty(values.iter().cloned()),
        }
    }

    /// JSON form of the value. Non-finite floats have no JSON representation.
    pub fn to_json(&self) -> Result<Json> {
        Ok(match self {
            Value::String { value, .. } => Json::String(value.clone()),
            Value::Bool(b) => Json::Bool(*b),
            Value::Date(date) => Json::from(date.timestamp_millis()),
            Value::Int { value, .. } => Json::from(*value),
            Value::UInt { value, .. } => Json::from(*value),
            Value::Float(v) => float(*v)?,
            Value::Bytes(v) | Value::Frequency(v) => Json::from(*v),
            Value::Enum { name, .. } => Json::String(name.clone()),
            Value::IntArray { values, .. } => {
                Json::Array(values.iter().map(|v| Json::from(*v)).collect())
            }
            Value::FloatArray(values) => {
                Json::Array(values.iter().map(|v| float(*v)).collect::<Result<_>>()?)
            }
            Value::StringArray(values) => {
                Json::Array(values.iter().cloned().map(Json::String).collect())
            }
        })
    }
}

fn float(v: f64) -> Result<Json> {
    match Number::from_f64(v) {
        Some(n) => Ok(Json::Number(n)),
        None => bail!("cannot serialize non-finite number {}", v),
    }
}

fn lookup_number<T: PartialEq + ToString + Copy>(value: T, lookup: Option<Lookup<T>>) -> String {
    match lookup {
        Some(table) => match table.iter().find(|(k, _)| *k == value) {
            Some((_, label)) => label.to_string(),
            None => Text::key_with("unknown_value_number", [value.to_string()]).render(),
        },
        None => value.to_string(),
    }
}

fn join_or_empty(items: impl Iterator<Item = String>) -> String {
    let items: Vec<String> = items.collect();
    if items.is_empty() {
        Text::key("list_no_elements").render()
    } else {
        items.join(", ")
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String {
            value: value.to_string(),
            display: None,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String {
            value,
            display: None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int {
            value,
            lookup: None,
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::from(value as i64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt {
            value,
            lookup: None,
        }
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::from(value as u64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(values: Vec<String>) -> Self {
        Value::StringArray(values)
    }
}

impl From<Vec<i64>> for Value {
    fn from(values: Vec<i64>) -> Self {
        Value::IntArray {
            values,
            lookup: None,
        }
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::FloatArray(values)
    }
}

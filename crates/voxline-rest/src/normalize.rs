//! Response normalisation.
//!
//! The remote API answers in `snake_case`. Every object key that contains an
//! underscore after its first character gets a `camelCase` alias next to it,
//! recursively through nested objects and arrays. Afterwards the camel-cased
//! date fields (`startDate`, `dateCreated`, ...) are parsed into timestamps
//! wherever they appear. The original `snake_case` entries are kept as
//! received so existing consumers keep working.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// Keys whose string values are coerced into timestamps
pub const DATE_KEYS: [&str; 6] = [
    "startDate",
    "endDate",
    "dateCreated",
    "dateUpdated",
    "startTime",
    "endTime",
];

/// JSON value tree with a dedicated timestamp variant
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Normalized {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Normalized>),
    Object(IndexMap<String, Normalized>),
}

static NULL: Normalized = Normalized::Null;

impl Normalized {
    /// Normalise a decoded JSON body
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Normalized::Null,
            Value::Bool(b) => Normalized::Bool(b),
            Value::Number(n) => Normalized::Number(n),
            Value::String(s) => Normalized::String(s),
            Value::Array(items) => {
                Normalized::Array(items.into_iter().map(Normalized::from_json).collect())
            }
            Value::Object(map) => Normalized::Object(normalize_object(map)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Normalized> {
        match self {
            Normalized::Object(map) => map.get(key),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Normalized::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Normalized::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Normalized::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Normalized>> {
        match self {
            Normalized::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Normalized>> {
        match self {
            Normalized::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Normalized::Null)
    }

    /// Back to plain JSON; timestamps become RFC 3339 strings
    pub fn to_json(&self) -> Value {
        match self {
            Normalized::Null => Value::Null,
            Normalized::Bool(b) => Value::Bool(*b),
            Normalized::Number(n) => Value::Number(n.clone()),
            Normalized::String(s) => Value::String(s.clone()),
            Normalized::Date(d) => Value::String(d.to_rfc3339()),
            Normalized::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Normalized::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl std::ops::Index<&str> for Normalized {
    type Output = Normalized;

    /// Missing keys and non-objects index to `Null`, like `serde_json::Value`
    fn index(&self, key: &str) -> &Normalized {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Serialize for Normalized {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<Value> for Normalized {
    fn from(value: Value) -> Self {
        Normalized::from_json(value)
    }
}

fn normalize_object(map: Map<String, Value>) -> IndexMap<String, Normalized> {
    let mut out = IndexMap::with_capacity(map.len());

    for (key, value) in map {
        let value = Normalized::from_json(value);
        match camel_alias(&key) {
            Some(alias) => {
                out.insert(key, value.clone());
                out.insert(alias, value);
            }
            None => {
                out.insert(key, value);
            }
        }
    }

    for date_key in DATE_KEYS {
        if let Some(slot) = out.get_mut(date_key) {
            if let Some(parsed) = slot.as_str().and_then(parse_date) {
                *slot = Normalized::Date(parsed);
            }
        }
    }

    out
}

/// `call_sid` -> `callSid`. Only a `_` followed by a lowercase ASCII letter is
/// folded, and keys starting with `_` are left alone.
pub fn camel_alias(key: &str) -> Option<String> {
    match key.find('_') {
        Some(pos) if pos > 0 => {}
        _ => return None,
    }

    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_lowercase) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(c);
    }

    (out != key).then_some(out)
}

/// RFC 3339 (`2020-01-01T00:00:00Z`) or the provider's RFC 2822 form
/// (`Wed, 18 Aug 2010 20:20:06 +0000`)
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|d| d.with_timezone(&Utc))
        .ok()
}

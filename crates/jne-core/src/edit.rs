// Pending field edits for one node.
// - `EditValue` covers the scalars a form can hold.
// - `EditSet` maps field key -> pending value; seeded from a snapshot, then
//   overwritten by user input.
// - `EditSet::coerce_to` is the optional step that turns typed text back into
//   the field's declared kind. Without it, edits are written as given.
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::snapshot::{FieldRow, JsonKind, NodeSnapshot, compute_editable_fields};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditValue {
    Null,
    Bool(bool),
    Number(Number),
    Str(String),
}

impl EditValue {
    /// `None` for objects and arrays.
    pub fn from_scalar(v: &Value) -> Option<Self> {
        match v {
            Value::Null => Some(EditValue::Null),
            Value::Bool(b) => Some(EditValue::Bool(*b)),
            Value::Number(n) => Some(EditValue::Number(n.clone())),
            Value::String(s) => Some(EditValue::Str(s.clone())),
            Value::Object(_) | Value::Array(_) => None,
        }
    }

    pub fn kind(&self) -> JsonKind {
        match self {
            EditValue::Null => JsonKind::Null,
            EditValue::Bool(_) => JsonKind::Boolean,
            EditValue::Number(_) => JsonKind::Number,
            EditValue::Str(_) => JsonKind::String,
        }
    }
}

impl From<&EditValue> for Value {
    fn from(v: &EditValue) -> Self {
        match v {
            EditValue::Null => Value::Null,
            EditValue::Bool(b) => Value::Bool(*b),
            EditValue::Number(n) => Value::Number(n.clone()),
            EditValue::Str(s) => Value::String(s.clone()),
        }
    }
}

impl From<&str> for EditValue {
    fn from(s: &str) -> Self {
        EditValue::Str(s.to_string())
    }
}

impl From<String> for EditValue {
    fn from(s: String) -> Self {
        EditValue::Str(s)
    }
}

impl From<i64> for EditValue {
    fn from(n: i64) -> Self {
        EditValue::Number(n.into())
    }
}

impl From<f64> for EditValue {
    fn from(f: f64) -> Self {
        Number::from_f64(f).map(EditValue::Number).unwrap_or(EditValue::Null)
    }
}

impl From<bool> for EditValue {
    fn from(b: bool) -> Self {
        EditValue::Bool(b)
    }
}

/// Strings show as typed; other scalars as their JSON text.
impl fmt::Display for EditValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditValue::Null => f.write_str("null"),
            EditValue::Bool(b) => write!(f, "{}", b),
            EditValue::Number(n) => write!(f, "{}", n),
            EditValue::Str(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSet {
    fields: BTreeMap<String, EditValue>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial values for every editable row. Rows without a current value
    /// start as an empty string; `null` fields stay `null`.
    pub fn seed(rows: &[FieldRow]) -> Self {
        compute_editable_fields(rows)
            .into_iter()
            .filter_map(|row| {
                let key = row.key.clone()?;
                let value = row
                    .value
                    .as_ref()
                    .and_then(EditValue::from_scalar)
                    .unwrap_or_else(|| EditValue::Str(String::new()));
                Some((key, value))
            })
            .collect()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<EditValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Records form input as-is. The value becomes a string regardless of the
    /// field's original kind unless the set is later coerced.
    pub fn set_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.fields.insert(key.into(), EditValue::Str(text.into()));
    }

    pub fn get(&self, key: &str) -> Option<&EditValue> {
        self.fields.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<EditValue> {
        self.fields.remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EditValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Converts textual values to the declared kind of the matching snapshot
    /// row where the text parses as that kind. Anything else is kept as is.
    pub fn coerce_to(&self, snapshot: &NodeSnapshot) -> EditSet {
        self.iter()
            .map(|(k, v)| {
                let coerced = match snapshot.field(k) {
                    Some(row) => coerce(v, row.kind),
                    None => v.clone(),
                };
                (k.to_string(), coerced)
            })
            .collect()
    }
}

fn coerce(value: &EditValue, kind: JsonKind) -> EditValue {
    let EditValue::Str(text) = value else {
        return value.clone();
    };
    let trimmed = text.trim();
    let parsed = match kind {
        JsonKind::Number => serde_json::from_str::<Number>(trimmed).ok().map(EditValue::Number),
        JsonKind::Boolean => match trimmed {
            "true" => Some(EditValue::Bool(true)),
            "false" => Some(EditValue::Bool(false)),
            _ => None,
        },
        JsonKind::Null if trimmed == "null" => Some(EditValue::Null),
        _ => None,
    };
    parsed.unwrap_or_else(|| value.clone())
}

impl<K: Into<String>> FromIterator<(K, EditValue)> for EditSet {
    fn from_iter<I: IntoIterator<Item = (K, EditValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EditSet {
    type Item = (&'a String, &'a EditValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, EditValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

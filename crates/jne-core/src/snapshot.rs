// Read-only views of the node a path selects.
// A `NodeSnapshot` lists the node's direct children as `FieldRow`s in document
// order; only keyed scalar rows are editable.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::EditError;
use crate::path::{Path, Segment, format_path, resolve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonKind {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Array,
}

impl JsonKind {
    pub fn of(v: &Value) -> Self {
        match v {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(_) => JsonKind::Number,
            Value::String(_) => JsonKind::String,
            Value::Object(_) => JsonKind::Object,
            Value::Array(_) => JsonKind::Array,
        }
    }

    pub fn is_container(self) -> bool {
        matches!(self, JsonKind::Object | JsonKind::Array)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JsonKind::String => "string",
            JsonKind::Number => "number",
            JsonKind::Boolean => "boolean",
            JsonKind::Null => "null",
            JsonKind::Object => "object",
            JsonKind::Array => "array",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One direct child of a node. `value` is only carried for scalar kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub kind: JsonKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldRow {
    pub fn from_value(key: Option<String>, v: &Value) -> Self {
        let kind = JsonKind::of(v);
        let value = if kind.is_container() { None } else { Some(v.clone()) };
        Self { key, kind, value }
    }

    pub fn is_editable(&self) -> bool {
        self.key.is_some() && !self.kind.is_container()
    }
}

/// Keyed scalar rows, in their original order.
pub fn compute_editable_fields(rows: &[FieldRow]) -> Vec<&FieldRow> {
    rows.iter().filter(|r| r.is_editable()).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub path: Path,
    pub rows: Vec<FieldRow>,
}

impl NodeSnapshot {
    /// Captures the children of the value at `path`.
    ///
    /// Object members become keyed rows, array elements unnamed rows, and a
    /// scalar target a single unnamed row holding its own value.
    pub fn capture(root: &Value, path: &[Segment]) -> Result<Self, EditError> {
        let node = resolve(root, path)?;
        let rows = match node {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| FieldRow::from_value(Some(k.clone()), v))
                .collect(),
            Value::Array(arr) => arr.iter().map(|v| FieldRow::from_value(None, v)).collect(),
            scalar => vec![FieldRow::from_value(None, scalar)],
        };
        Ok(Self { path: path.to_vec(), rows })
    }

    pub fn editable_fields(&self) -> Vec<&FieldRow> {
        compute_editable_fields(&self.rows)
    }

    pub fn field(&self, key: &str) -> Option<&FieldRow> {
        self.rows.iter().find(|r| r.key.as_deref() == Some(key))
    }

    pub fn path_display(&self) -> String {
        format_path(Some(&self.path))
    }
}

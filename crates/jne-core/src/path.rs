// Path addressing over serde_json::Value.
// - A path is an ordered list of `Segment`s: object keys and array indices.
// - Resolve: `resolve` / `resolve_container` walk from the root and name the
//   first segment that does not exist.
// - Display: `format_path` renders `$["users"][0]["name"]`.
// - Interop: RFC 6901 pointers (`/users/0/name`) and JSON arrays
//   (`["users",0,"name"]`) convert into paths.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Write as _};

use crate::error::EditError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Index(usize),
    Key(String),
}

pub type Path = Vec<Segment>;

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Segment::Index(i)
    }
}

impl From<&str> for Segment {
    fn from(k: &str) -> Self {
        Segment::Key(k.to_string())
    }
}

impl From<String> for Segment {
    fn from(k: String) -> Self {
        Segment::Key(k)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "{}", i),
            Segment::Key(k) => write!(f, "{}", Value::from(k.as_str())),
        }
    }
}

/// Parses a decimal array index the way it would be written by a serializer:
/// no sign, no leading zeros.
pub(crate) fn canonical_index(s: &str) -> Option<usize> {
    if s.is_empty() || (s.len() > 1 && s.starts_with('0')) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// Keys on arrays and indices on objects behave like dynamic property access:
// `arr["2"]` is element 2 and `obj[2]` is member "2".
fn step<'a>(value: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (segment, value) {
        (Segment::Key(k), Value::Object(map)) => map.get(k),
        (Segment::Key(k), Value::Array(arr)) => canonical_index(k).and_then(|i| arr.get(i)),
        (Segment::Index(i), Value::Array(arr)) => arr.get(*i),
        (Segment::Index(i), Value::Object(map)) => map.get(&i.to_string()),
        _ => None,
    }
}

fn step_mut<'a>(value: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (segment, value) {
        (Segment::Key(k), Value::Object(map)) => map.get_mut(k),
        (Segment::Key(k), Value::Array(arr)) => canonical_index(k).and_then(|i| arr.get_mut(i)),
        (Segment::Index(i), Value::Array(arr)) => arr.get_mut(*i),
        (Segment::Index(i), Value::Object(map)) => map.get_mut(&i.to_string()),
        _ => None,
    }
}

fn not_found(path: &[Segment], index: usize) -> EditError {
    EditError::PathResolution {
        path: format_path(Some(path)),
        index,
        segment: path[index].clone(),
    }
}

/// Read-only walk of `path` from `root`.
pub fn resolve<'a>(root: &'a Value, path: &[Segment]) -> Result<&'a Value, EditError> {
    let mut current = root;
    for (i, segment) in path.iter().enumerate() {
        current = step(current, segment).ok_or_else(|| not_found(path, i))?;
    }
    Ok(current)
}

/// Walks `path` from `root` and returns the live value it addresses.
///
/// The returned reference borrows `root`, so writes through it land in the
/// document itself. Fails with [`EditError::PathResolution`] carrying the
/// index of the first segment that is missing on the current shape.
pub fn resolve_container<'a>(root: &'a mut Value, path: &[Segment]) -> Result<&'a mut Value, EditError> {
    let mut current = root;
    for (i, segment) in path.iter().enumerate() {
        current = step_mut(current, segment).ok_or_else(|| not_found(path, i))?;
    }
    Ok(current)
}

/// Bracketed accessor notation rooted at `$`. Empty or absent paths render as `$`.
pub fn format_path(path: Option<&[Segment]>) -> String {
    let mut out = String::from("$");
    for segment in path.unwrap_or_default() {
        match segment {
            Segment::Index(i) => {
                write!(&mut out, "[{}]", i).ok();
            }
            Segment::Key(k) => {
                write!(&mut out, "[{}]", Value::from(k.as_str())).ok();
            }
        }
    }
    out
}

/// Renders a path as an RFC 6901 JSON Pointer.
pub fn to_pointer(path: &[Segment]) -> String {
    let mut out = String::new();
    for segment in path {
        out.push('/');
        match segment {
            Segment::Index(i) => out.push_str(&i.to_string()),
            Segment::Key(k) => out.push_str(&k.replace('~', "~0").replace('/', "~1")),
        }
    }
    out
}

fn unescape_token(tok: &str) -> String {
    let s = tok.replace("~1", "/");
    s.replace("~0", "~")
}

/// Parses an RFC 6901 pointer. Tokens that read as array indices become
/// [`Segment::Index`]; resolution still finds object members named by digits.
pub fn parse_pointer(pointer: &str) -> Result<Path, EditError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(EditError::InvalidPath(format!("json pointer must start with '/': {}", pointer)));
    };
    Ok(rest
        .split('/')
        .map(|tok| match canonical_index(tok) {
            Some(i) => Segment::Index(i),
            None => Segment::Key(unescape_token(tok)),
        })
        .collect())
}

/// Parses a path written as a JSON array of strings and non-negative integers.
pub fn parse_path(text: &str) -> Result<Path, EditError> {
    serde_json::from_str::<Path>(text)
        .map_err(|e| EditError::InvalidPath(format!("expected a JSON array of keys and indices: {}", e)))
}

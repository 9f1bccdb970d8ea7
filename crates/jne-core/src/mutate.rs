// Applying an EditSet to the node at a path and producing new document text.
// The whole document is parsed, mutated in memory and re-serialized; nothing
// is written back unless every step succeeds.
use serde_json::Value;

use crate::edit::EditSet;
use crate::error::EditError;
use crate::path::{Segment, canonical_index, format_path, resolve_container};
use crate::snapshot::JsonKind;

/// Parses `document`, applies `edits` to the node at `path`, and returns the
/// re-serialized document.
///
/// Values are written blindly: an edit may change a field's kind (text typed
/// into a numeric field stays text). Use [`EditSet::coerce_to`] beforehand
/// for kind-preserving input.
pub fn apply_edits(document: &str, path: &[Segment], edits: &EditSet) -> Result<String, EditError> {
    let mut root: Value = serde_json::from_str(document).map_err(EditError::MalformedDocument)?;
    apply_edits_to_value(&mut root, path, edits)?;
    to_canonical_text(&root)
}

/// In-place variant of [`apply_edits`]. Returns the number of fields written.
///
/// All keys are checked against the node before the first write, so on error
/// `root` is left as it was.
pub fn apply_edits_to_value(root: &mut Value, path: &[Segment], edits: &EditSet) -> Result<usize, EditError> {
    let container = resolve_container(root, path)?;
    if edits.is_empty() {
        return Ok(0);
    }
    let unknown = |key: &str| EditError::UnknownField {
        path: format_path(Some(path)),
        key: key.to_string(),
    };
    match container {
        Value::Object(map) => {
            if let Some(key) = edits.keys().find(|k| !map.contains_key(*k)) {
                return Err(unknown(key));
            }
            for (key, value) in edits {
                if let Some(slot) = map.get_mut(key) {
                    *slot = value.into();
                }
            }
        }
        Value::Array(arr) => {
            let mut slots = Vec::with_capacity(edits.len());
            for (key, value) in edits {
                let idx = canonical_index(key)
                    .filter(|i| *i < arr.len())
                    .ok_or_else(|| unknown(key.as_str()))?;
                slots.push((idx, value));
            }
            for (idx, value) in slots {
                arr[idx] = value.into();
            }
        }
        scalar => {
            return Err(EditError::NotAContainer {
                path: format_path(Some(path)),
                kind: JsonKind::of(scalar),
            });
        }
    }
    Ok(edits.len())
}

/// Two-space pretty printing; object members keep their insertion order.
pub fn to_canonical_text(root: &Value) -> Result<String, EditError> {
    serde_json::to_string_pretty(root).map_err(EditError::Serialize)
}

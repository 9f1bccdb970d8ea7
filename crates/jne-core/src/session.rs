// One editing session over a selected node.
// Opening reads the store once and seeds the EditSet from the node's
// snapshot; `save` reads again, applies the edits and commits once. Failures
// are logged and returned as `SaveOutcome::Failed`, leaving the session and
// its pending edits in place for a retry.
use std::borrow::Cow;

use serde_json::Value;

use crate::edit::{EditSet, EditValue};
use crate::error::EditError;
use crate::mutate::apply_edits;
use crate::path::{Path, format_path};
use crate::snapshot::{FieldRow, NodeSnapshot};
use crate::store::DocumentStore;

#[derive(Debug)]
pub enum SaveOutcome {
    /// Document committed; carries the number of fields written.
    Saved { fields: usize },
    /// No node was selected. Nothing was read or written.
    NoNode,
    Failed(EditError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

#[derive(Debug, Default)]
pub struct EditSession {
    snapshot: Option<NodeSnapshot>,
    edits: EditSet,
    coerce: bool,
}

impl EditSession {
    /// Opens a session for `path` against the current store contents.
    /// `None` yields an empty session whose save is a no-op.
    pub fn open<S: DocumentStore + ?Sized>(store: &S, path: Option<Path>) -> Result<Self, EditError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = store.load()?;
        let root: Value = serde_json::from_str(&text).map_err(EditError::MalformedDocument)?;
        let snapshot = NodeSnapshot::capture(&root, &path)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_snapshot(snapshot: NodeSnapshot) -> Self {
        let edits = EditSet::seed(&snapshot.rows);
        Self { snapshot: Some(snapshot), edits, coerce: false }
    }

    /// Convert typed text back to each field's original kind on save.
    pub fn with_coercion(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    pub fn is_open(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&NodeSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn path_display(&self) -> String {
        format_path(self.snapshot.as_ref().map(|s| s.path.as_slice()))
    }

    pub fn fields(&self) -> Vec<&FieldRow> {
        self.snapshot.as_ref().map(|s| s.editable_fields()).unwrap_or_default()
    }

    pub fn edits(&self) -> &EditSet {
        &self.edits
    }

    pub fn value(&self, key: &str) -> Option<&EditValue> {
        self.edits.get(key)
    }

    pub fn set_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.edits.set_text(key, text);
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<EditValue>) {
        self.edits.set(key, value);
    }

    /// Commits the pending edits. On success the session closes and its edits
    /// are consumed; any later save is a no-op.
    pub fn save<S: DocumentStore + ?Sized>(&mut self, store: &mut S) -> SaveOutcome {
        let Some(snapshot) = self.snapshot.as_ref() else {
            tracing::debug!("save requested with no node selected");
            return SaveOutcome::NoNode;
        };
        let edits = if self.coerce {
            Cow::Owned(self.edits.coerce_to(snapshot))
        } else {
            Cow::Borrowed(&self.edits)
        };
        let shown = snapshot.path_display();
        let result = store
            .load()
            .map_err(EditError::from)
            .and_then(|text| apply_edits(&text, &snapshot.path, &edits))
            .and_then(|updated| store.commit(updated).map_err(EditError::from));
        match result {
            Ok(()) => {
                let fields = edits.len();
                drop(edits);
                tracing::info!(path = %shown, fields, "node updated");
                self.close();
                SaveOutcome::Saved { fields }
            }
            Err(e) => {
                tracing::error!(path = %shown, error = %e, "error updating node");
                SaveOutcome::Failed(e)
            }
        }
    }

    /// Discards the session without touching the store.
    pub fn cancel(self) {
        tracing::debug!(path = %self.path_display(), pending = self.edits.len(), "edit cancelled");
    }

    fn close(&mut self) {
        self.snapshot = None;
        self.edits = EditSet::default();
    }
}

//! jne-core: path-addressed editing of a single node inside a JSON document
//!
//! This crate focuses on a small, well-factored surface:
//! - Path resolution over `serde_json::Value` (keys and indices), with
//!   `$["a"][0]` display and RFC 6901 pointer interop
//! - Node snapshots: the direct children of the selected node as field rows
//! - Edit sets: pending scalar overrides for the node's keyed fields
//! - Mutation: apply an edit set and re-serialize the whole document
//! - Document stores (memory, file with zip backup) and the edit session that
//!   ties them together
//!
pub mod edit;
pub mod error;
pub mod mutate;
pub mod path;
pub mod session;
pub mod snapshot;
pub mod store;

pub use edit::{EditSet, EditValue};
pub use error::{EditError, StoreError};
pub use mutate::{apply_edits, apply_edits_to_value, to_canonical_text};
pub use path::{
    Path, Segment, format_path, parse_path, parse_pointer, resolve, resolve_container, to_pointer,
};
pub use session::{EditSession, SaveOutcome};
pub use snapshot::{FieldRow, JsonKind, NodeSnapshot, compute_editable_fields};
pub use store::{DocumentStore, FileStore, MemoryStore, StoreOptions, zip_backup_file};

//! Patch operations, results, and the error taxonomy.

use serde_json::{Map, Value};
use thiserror::Error;

use submodel_path::ElementPath;

use crate::codec::json::CodecError;
use crate::contract::Cardinality;
use crate::element::{ModelType, Submodel};
use crate::naming::NamingError;
use crate::resolve::ResolveError;

// ── Operations ────────────────────────────────────────────────────────────

/// A single patch operation against a submodel document.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    /// Replace a Property's scalar, or a Range's `min`/`max` from an
    /// object payload.
    SetValue { path: ElementPath, value: Value },
    /// Replace a MultiLanguageProperty's language map.
    SetMultiLang {
        path: ElementPath,
        value: Map<String, Value>,
    },
    /// Update a File or Blob reference; absent fields stay untouched.
    SetFileRef {
        path: ElementPath,
        content_type: Option<String>,
        reference: Option<String>,
    },
    /// Append a new item to a list. The optional object payload fills the
    /// item's fields; an `idShort` key inside it names the item
    /// explicitly.
    AddListItem {
        path: ElementPath,
        value: Option<Value>,
    },
    /// Delete the item at `index` from a list.
    RemoveListItem { path: ElementPath, index: usize },
}

impl PatchOp {
    /// The wire name of the operation.
    pub fn op_name(&self) -> &'static str {
        match self {
            PatchOp::SetValue { .. } => "set_value",
            PatchOp::SetMultiLang { .. } => "set_multilang",
            PatchOp::SetFileRef { .. } => "set_file_ref",
            PatchOp::AddListItem { .. } => "add_list_item",
            PatchOp::RemoveListItem { .. } => "remove_list_item",
        }
    }

    /// The path the operation targets.
    pub fn path(&self) -> &ElementPath {
        match self {
            PatchOp::SetValue { path, .. } => path,
            PatchOp::SetMultiLang { path, .. } => path,
            PatchOp::SetFileRef { path, .. } => path,
            PatchOp::AddListItem { path, .. } => path,
            PatchOp::RemoveListItem { path, .. } => path,
        }
    }
}

/// Result of a successful patch call.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOutcome {
    /// The mutated document. The caller's input is never touched.
    pub submodel: Submodel,
    pub applied_operations: usize,
}

// ── Errors ────────────────────────────────────────────────────────────────

/// An operation was applied to a node it cannot handle, or could not be
/// understood at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnsupportedOperation {
    #[error("unknown op '{0}'")]
    UnknownOp(String),
    #[error("op '{op}' cannot target {actual} at '{path}', expected {expected}")]
    TypeMismatch {
        op: &'static str,
        path: String,
        expected: &'static str,
        actual: ModelType,
    },
    #[error("op '{op}' at '{path}': expected {expected}")]
    PayloadShape {
        op: &'static str,
        path: String,
        expected: &'static str,
    },
    #[error("add_list_item at '{path}' has no template: the list is empty and the contract declares no item schema")]
    NoItemTemplate { path: String },
}

/// The contract forbids the requested mutation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("'{path}' is read-only")]
    ReadOnly { path: String },
    #[error("cardinality '{cardinality}' blocks add_list_item at '{path}'")]
    CardinalityForbidsAdd {
        path: String,
        cardinality: Cardinality,
    },
    #[error("cardinality '{cardinality}' blocks removing the last item at '{path}'")]
    CardinalityForbidsRemove {
        path: String,
        cardinality: Cardinality,
    },
    #[error("'{path}' has no contract entry")]
    PathUnknown { path: String },
}

/// Top-level patch error. The first failing operation aborts the whole
/// call; no partially patched document is ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedOperation),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    #[error("name policy rejected item at '{path}': {source}")]
    Naming {
        path: String,
        #[source]
        source: NamingError,
    },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use submodel_path::parse_path;

    #[test]
    fn op_name_and_path_accessors() {
        let path = parse_path("Materials/0").unwrap();
        let op = PatchOp::RemoveListItem { path: path.clone(), index: 0 };
        assert_eq!(op.op_name(), "remove_list_item");
        assert_eq!(op.path(), &path);

        let op = PatchOp::SetValue {
            path: parse_path("Weight").unwrap(),
            value: serde_json::json!(1),
        };
        assert_eq!(op.op_name(), "set_value");
    }

    #[test]
    fn errors_render_with_context() {
        let err = PatchError::from(ContractViolation::CardinalityForbidsAdd {
            path: "Materials".to_string(),
            cardinality: Cardinality::One,
        });
        assert_eq!(
            err.to_string(),
            "cardinality 'One' blocks add_list_item at 'Materials'"
        );

        let err = PatchError::from(ResolveError::PathNotFound {
            path: "Nameplate/Serial".to_string(),
            segment: "Serial".to_string(),
        });
        assert_eq!(err.to_string(), "no element named 'Serial' in 'Nameplate/Serial'");
    }
}

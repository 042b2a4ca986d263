//! submodel-patch: deterministic, contract-governed patch engine for
//! AAS submodel documents.
//!
//! A submodel is a typed tree of named elements (properties,
//! multi-language strings, ranges, files, collections, lists, entities,
//! relationships). The engine takes a document, a list of patch
//! operations, and an optional contract describing per-node mutability
//! and cardinality, and returns a mutated copy, or the first error. The
//! same inputs always produce byte-identical output, which is what keeps
//! digests and signatures stable upstream.
//!
//! The engine is a pure library: no I/O, no persistence, no knowledge of
//! revisions. Each call deep-copies its input, so concurrent calls share
//! no state and a failed patch never leaks a partially mutated document.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use submodel_patch::codec::json::{op_from_json, submodel_from_json};
//! use submodel_patch::apply_patch;
//!
//! let submodel = submodel_from_json(&json!({
//!     "idShort": "TechnicalData",
//!     "submodelElements": [
//!         {"idShort": "Weight", "modelType": "Property", "value": 12.5},
//!     ],
//! })).unwrap();
//!
//! let op = op_from_json(&json!({
//!     "op": "set_value", "path": "Weight", "value": 42.5,
//! })).unwrap();
//!
//! let outcome = apply_patch(&submodel, &[op], None, false).unwrap();
//! assert_eq!(outcome.applied_operations, 1);
//! ```

pub mod element;
pub mod contract;
pub mod resolve;
pub mod naming;
pub mod types;
pub mod apply;
pub mod codec;

pub use element::{ElementBody, LangString, ModelType, Submodel, SubmodelElement};
pub use contract::{
    AccessMode, Cardinality, ContractIndex, ContractNode, NamingRule, SmtQualifier,
};
pub use resolve::{resolve, resolve_mut, ResolveError};
pub use naming::{NamePolicy, NameTemplate, NamingError};
pub use types::{
    ContractViolation, PatchError, PatchOp, PatchOutcome, UnsupportedOperation,
};
pub use apply::apply_patch;

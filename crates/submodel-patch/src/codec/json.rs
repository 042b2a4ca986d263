//! JSON codec: the engine's only boundary to the wire.
//!
//! Operations arrive from the API layer as `{op, path, value?, index?}`
//! objects; documents and contracts arrive from the persistence and
//! template collaborators in AAS-style JSON with a `modelType`
//! discriminator per element. Everything is decoded into the typed tree
//! here and encoded back on the way out; no other module touches raw
//! JSON shapes.

use serde_json::{json, Map, Value};
use thiserror::Error;

use submodel_path::{format_path, parse_path, PathError};

use crate::contract::{AccessMode, Cardinality, ContractNode, NamingRule, SmtQualifier};
use crate::element::{
    sort_lang_strings, ElementBody, LangString, ModelType, Submodel, SubmodelElement,
};
use crate::types::{PatchError, PatchOp, UnsupportedOperation};

/// A wire payload did not have the expected shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("{0} must be an object")]
    NotAnObject(&'static str),
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' must be {expected}")]
    FieldType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("unknown model type '{0}'")]
    UnknownModelType(String),
    #[error("unknown access mode '{0}'")]
    UnknownAccessMode(String),
    #[error("unknown cardinality '{0}'")]
    UnknownCardinality(String),
    #[error("unknown naming rule '{0}'")]
    UnknownNamingRule(String),
    #[error(transparent)]
    Path(#[from] PathError),
}

// ── Operations ────────────────────────────────────────────────────────────

/// Decode one wire operation.
pub fn op_from_json(v: &Value) -> Result<PatchOp, PatchError> {
    let obj = v
        .as_object()
        .ok_or(CodecError::NotAnObject("operation"))?;
    let op = obj
        .get("op")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingField("op"))?;
    let path_str = obj
        .get("path")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingField("path"))?;
    let path = parse_path(path_str).map_err(CodecError::from)?;
    match op {
        "set_value" => {
            let value = obj
                .get("value")
                .cloned()
                .ok_or(CodecError::MissingField("value"))?;
            Ok(PatchOp::SetValue { path, value })
        }
        "set_multilang" => {
            let value = obj
                .get("value")
                .ok_or(CodecError::MissingField("value"))?
                .as_object()
                .ok_or(CodecError::FieldType {
                    field: "value",
                    expected: "a language map object",
                })?
                .clone();
            Ok(PatchOp::SetMultiLang { path, value })
        }
        "set_file_ref" => {
            let payload = obj
                .get("value")
                .ok_or(CodecError::MissingField("value"))?
                .as_object()
                .ok_or(CodecError::FieldType {
                    field: "value",
                    expected: "a file reference object",
                })?;
            let content_type = optional_str(payload, "contentType")?;
            // "url" wins over "value" when both are present.
            let reference = match optional_str(payload, "url")? {
                Some(url) => Some(url),
                None => optional_str(payload, "value")?,
            };
            Ok(PatchOp::SetFileRef {
                path,
                content_type,
                reference,
            })
        }
        "add_list_item" => Ok(PatchOp::AddListItem {
            path,
            value: obj.get("value").cloned(),
        }),
        "remove_list_item" => {
            let index = obj
                .get("index")
                .ok_or(CodecError::MissingField("index"))?
                .as_u64()
                .ok_or(CodecError::FieldType {
                    field: "index",
                    expected: "a non-negative integer",
                })? as usize;
            Ok(PatchOp::RemoveListItem { path, index })
        }
        other => Err(UnsupportedOperation::UnknownOp(other.to_string()).into()),
    }
}

/// Decode a wire operation list.
pub fn ops_from_json(v: &Value) -> Result<Vec<PatchOp>, PatchError> {
    let arr = v.as_array().ok_or(CodecError::FieldType {
        field: "operations",
        expected: "an array",
    })?;
    arr.iter().map(op_from_json).collect()
}

/// Encode an operation back to its wire shape.
pub fn op_to_json(op: &PatchOp) -> Value {
    match op {
        PatchOp::SetValue { path, value } => json!({
            "op": "set_value",
            "path": format_path(path),
            "value": value,
        }),
        PatchOp::SetMultiLang { path, value } => json!({
            "op": "set_multilang",
            "path": format_path(path),
            "value": Value::Object(value.clone()),
        }),
        PatchOp::SetFileRef {
            path,
            content_type,
            reference,
        } => {
            let mut payload = Map::new();
            if let Some(content_type) = content_type {
                payload.insert("contentType".to_string(), json!(content_type));
            }
            if let Some(reference) = reference {
                payload.insert("value".to_string(), json!(reference));
            }
            json!({
                "op": "set_file_ref",
                "path": format_path(path),
                "value": Value::Object(payload),
            })
        }
        PatchOp::AddListItem { path, value } => {
            let mut m = Map::new();
            m.insert("op".to_string(), json!("add_list_item"));
            m.insert("path".to_string(), json!(format_path(path)));
            if let Some(value) = value {
                m.insert("value".to_string(), value.clone());
            }
            Value::Object(m)
        }
        PatchOp::RemoveListItem { path, index } => json!({
            "op": "remove_list_item",
            "path": format_path(path),
            "index": index,
        }),
    }
}

// ── Documents ─────────────────────────────────────────────────────────────

/// Decode a submodel document.
pub fn submodel_from_json(v: &Value) -> Result<Submodel, PatchError> {
    let obj = v.as_object().ok_or(CodecError::NotAnObject("submodel"))?;
    let id_short = obj
        .get("idShort")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingField("idShort"))?
        .to_string();
    let elements = element_list(obj, "submodelElements")?;
    Ok(Submodel { id_short, elements })
}

/// Encode a submodel document.
pub fn submodel_to_json(submodel: &Submodel) -> Value {
    json!({
        "idShort": submodel.id_short,
        "modelType": "Submodel",
        "submodelElements": submodel
            .elements
            .iter()
            .map(element_to_json)
            .collect::<Vec<_>>(),
    })
}

/// Decode one submodel element by its `modelType` discriminator.
pub fn element_from_json(v: &Value) -> Result<SubmodelElement, PatchError> {
    let obj = v
        .as_object()
        .ok_or(CodecError::NotAnObject("submodel element"))?;
    let model_type_str = obj
        .get("modelType")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingField("modelType"))?;
    let model_type = ModelType::from_str(model_type_str)
        .ok_or_else(|| CodecError::UnknownModelType(model_type_str.to_string()))?;
    let id_short = optional_str(obj, "idShort")?;
    let body = match model_type {
        ModelType::Property => ElementBody::Property {
            value: obj.get("value").cloned().unwrap_or(Value::Null),
        },
        ModelType::MultiLanguageProperty => {
            let mut value = match obj.get("value") {
                None => Vec::new(),
                Some(Value::Array(entries)) => entries
                    .iter()
                    .map(lang_string_from_json)
                    .collect::<Result<Vec<_>, _>>()?,
                Some(_) => {
                    return Err(CodecError::FieldType {
                        field: "value",
                        expected: "an array of language strings",
                    }
                    .into());
                }
            };
            // Canonicalize on ingest so output order never depends on input order.
            sort_lang_strings(&mut value);
            ElementBody::MultiLanguageProperty { value }
        }
        ModelType::Range => ElementBody::Range {
            min: obj.get("min").cloned().unwrap_or(Value::Null),
            max: obj.get("max").cloned().unwrap_or(Value::Null),
        },
        ModelType::File => ElementBody::File {
            content_type: optional_str(obj, "contentType")?,
            value: optional_str(obj, "value")?,
        },
        ModelType::Blob => ElementBody::Blob {
            content_type: optional_str(obj, "contentType")?,
            value: optional_str(obj, "value")?,
        },
        ModelType::Collection => ElementBody::Collection {
            children: element_list(obj, "value")?,
        },
        ModelType::List => ElementBody::List {
            items: element_list(obj, "value")?,
        },
        ModelType::Entity => ElementBody::Entity {
            statements: element_list(obj, "statements")?,
        },
        ModelType::Relationship => ElementBody::Relationship {
            first: obj.get("first").cloned().unwrap_or(Value::Null),
            second: obj.get("second").cloned().unwrap_or(Value::Null),
        },
        ModelType::AnnotatedRelationship => ElementBody::AnnotatedRelationship {
            first: obj.get("first").cloned().unwrap_or(Value::Null),
            second: obj.get("second").cloned().unwrap_or(Value::Null),
            annotations: element_list(obj, "annotations")?,
        },
    };
    Ok(SubmodelElement { id_short, body })
}

/// Encode one submodel element.
pub fn element_to_json(element: &SubmodelElement) -> Value {
    let mut m = Map::new();
    if let Some(id_short) = &element.id_short {
        m.insert("idShort".to_string(), json!(id_short));
    }
    m.insert("modelType".to_string(), json!(element.model_type().as_str()));
    match &element.body {
        ElementBody::Property { value } => {
            m.insert("value".to_string(), value.clone());
        }
        ElementBody::MultiLanguageProperty { value } => {
            m.insert(
                "value".to_string(),
                Value::Array(
                    value
                        .iter()
                        .map(|entry| json!({"language": entry.language, "text": entry.text}))
                        .collect(),
                ),
            );
        }
        ElementBody::Range { min, max } => {
            m.insert("min".to_string(), min.clone());
            m.insert("max".to_string(), max.clone());
        }
        ElementBody::File {
            content_type,
            value,
        }
        | ElementBody::Blob {
            content_type,
            value,
        } => {
            if let Some(content_type) = content_type {
                m.insert("contentType".to_string(), json!(content_type));
            }
            if let Some(value) = value {
                m.insert("value".to_string(), json!(value));
            }
        }
        ElementBody::Collection { children } => {
            m.insert(
                "value".to_string(),
                Value::Array(children.iter().map(element_to_json).collect()),
            );
        }
        ElementBody::List { items } => {
            m.insert(
                "value".to_string(),
                Value::Array(items.iter().map(element_to_json).collect()),
            );
        }
        ElementBody::Entity { statements } => {
            m.insert(
                "statements".to_string(),
                Value::Array(statements.iter().map(element_to_json).collect()),
            );
        }
        ElementBody::Relationship { first, second } => {
            m.insert("first".to_string(), first.clone());
            m.insert("second".to_string(), second.clone());
        }
        ElementBody::AnnotatedRelationship {
            first,
            second,
            annotations,
        } => {
            m.insert("first".to_string(), first.clone());
            m.insert("second".to_string(), second.clone());
            m.insert(
                "annotations".to_string(),
                Value::Array(annotations.iter().map(element_to_json).collect()),
            );
        }
    }
    Value::Object(m)
}

fn lang_string_from_json(v: &Value) -> Result<LangString, PatchError> {
    let obj = v
        .as_object()
        .ok_or(CodecError::NotAnObject("language string"))?;
    let language = obj
        .get("language")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingField("language"))?
        .to_string();
    let text = optional_str(obj, "text")?.unwrap_or_default();
    Ok(LangString { language, text })
}

fn element_list(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<SubmodelElement>, PatchError> {
    match obj.get(field) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().map(element_from_json).collect(),
        Some(_) => Err(CodecError::FieldType {
            field,
            expected: "an array",
        }
        .into()),
    }
}

fn optional_str(obj: &Map<String, Value>, field: &'static str) -> Result<Option<String>, CodecError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(CodecError::FieldType {
            field,
            expected: "a string",
        }),
    }
}

// ── Contracts ─────────────────────────────────────────────────────────────

/// Decode a contract tree. `children`, `statements`, and `annotations`
/// all land in the node's child group; `items` is the list item schema.
pub fn contract_from_json(v: &Value) -> Result<ContractNode, PatchError> {
    let obj = v
        .as_object()
        .ok_or(CodecError::NotAnObject("contract node"))?;
    let id_short = optional_str(obj, "idShort")?.unwrap_or_default();
    let model_type_str = obj
        .get("modelType")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingField("modelType"))?;
    let model_type = ModelType::from_str(model_type_str)
        .ok_or_else(|| CodecError::UnknownModelType(model_type_str.to_string()))?;
    let smt = match obj.get("smt") {
        None | Some(Value::Null) => None,
        Some(v) => Some(smt_from_json(v)?),
    };
    let mut children = Vec::new();
    for field in ["children", "statements", "annotations"] {
        if let Some(value) = obj.get(field) {
            let arr = value.as_array().ok_or(CodecError::FieldType {
                field,
                expected: "an array",
            })?;
            children = arr
                .iter()
                .map(contract_from_json)
                .collect::<Result<Vec<_>, _>>()?;
            break;
        }
    }
    let items = match obj.get("items") {
        None | Some(Value::Null) => None,
        Some(v) => Some(Box::new(contract_from_json(v)?)),
    };
    Ok(ContractNode {
        id_short,
        model_type,
        smt,
        children,
        items,
    })
}

fn smt_from_json(v: &Value) -> Result<SmtQualifier, PatchError> {
    let obj = v
        .as_object()
        .ok_or(CodecError::NotAnObject("smt qualifier"))?;
    let access_mode = match optional_str(obj, "access_mode")? {
        None => AccessMode::default(),
        Some(s) => {
            AccessMode::from_str(&s).ok_or_else(|| CodecError::UnknownAccessMode(s.clone()))?
        }
    };
    let cardinality = match optional_str(obj, "cardinality")? {
        None => None,
        Some(s) => Some(
            Cardinality::from_str(&s).ok_or_else(|| CodecError::UnknownCardinality(s.clone()))?,
        ),
    };
    let allowed_id_short = match obj.get("allowed_id_short") {
        None | Some(Value::Null) => None,
        Some(Value::Array(entries)) => {
            let mut names = Vec::with_capacity(entries.len());
            for entry in entries {
                let name = entry.as_str().ok_or(CodecError::FieldType {
                    field: "allowed_id_short",
                    expected: "an array of strings",
                })?;
                names.push(name.to_string());
            }
            Some(names)
        }
        Some(_) => {
            return Err(CodecError::FieldType {
                field: "allowed_id_short",
                expected: "an array of strings",
            }
            .into());
        }
    };
    let naming = match obj.get("naming") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match s.as_str() {
            "free" => Some(NamingRule::FreeForm),
            "id_short" => Some(NamingRule::Identifier),
            other => return Err(CodecError::UnknownNamingRule(other.to_string()).into()),
        },
        Some(Value::Object(rule)) => {
            let pattern = rule
                .get("pattern")
                .and_then(Value::as_str)
                .ok_or(CodecError::MissingField("pattern"))?;
            Some(NamingRule::Pattern(pattern.to_string()))
        }
        Some(_) => {
            return Err(CodecError::FieldType {
                field: "naming",
                expected: "a rule name or a pattern object",
            }
            .into());
        }
    };
    Ok(SmtQualifier {
        access_mode,
        cardinality,
        allowed_id_short,
        naming,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────

//! Patch application: the five mutation operators and the orchestrator.
//!
//! [`apply_patch`] is the only public entry point. It deep-copies the
//! caller's document, flattens the contract once, then folds the
//! operations over the copy in order. Later operations observe the
//! effects of earlier ones; the first failure aborts the call and the
//! caller's document stays untouched.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use submodel_path::{format_path, PathSegment};

use crate::contract::{AccessMode, ContractIndex, ContractNode};
use crate::element::{
    sort_lang_strings, ElementBody, LangString, ModelType, Submodel, SubmodelElement,
};
use crate::naming::NamePolicy;
use crate::resolve::{resolve_mut, ResolveError};
use crate::types::{ContractViolation, PatchError, PatchOp, PatchOutcome, UnsupportedOperation};

/// Apply `ops` to a copy of `submodel` under the given contract.
///
/// With `strict` set and a contract present, every touched path must have
/// a contract entry. Without a contract the engine applies trusted
/// patches with no mutability checking at all.
pub fn apply_patch(
    submodel: &Submodel,
    ops: &[PatchOp],
    contract: Option<&ContractNode>,
    strict: bool,
) -> Result<PatchOutcome, PatchError> {
    let mut working = submodel.clone();
    let contracts = contract.map(ContractIndex::build).unwrap_or_default();
    debug!(
        submodel = %working.id_short,
        ops = ops.len(),
        contract_entries = contracts.len(),
        strict,
        "applying patch"
    );
    let mut applied = 0usize;
    for op in ops {
        apply_op(&mut working, op, &contracts, contract.is_some(), strict)?;
        applied += 1;
    }
    Ok(PatchOutcome {
        submodel: working,
        applied_operations: applied,
    })
}

/// Contract gate plus dispatch for one operation.
fn apply_op(
    submodel: &mut Submodel,
    op: &PatchOp,
    contracts: &ContractIndex,
    has_contract: bool,
    strict: bool,
) -> Result<(), PatchError> {
    let node_contract = contracts.lookup(op.path());
    if has_contract && strict && node_contract.is_none() {
        return Err(ContractViolation::PathUnknown {
            path: format_path(op.path()),
        }
        .into());
    }
    if let Some(contract) = node_contract {
        if contract.access_mode() == AccessMode::ReadOnly {
            return Err(ContractViolation::ReadOnly {
                path: format_path(op.path()),
            }
            .into());
        }
    }
    debug!(op = op.op_name(), path = %format_path(op.path()), "applying operation");
    match op {
        PatchOp::SetValue { path, value } => set_value(submodel, path, value),
        PatchOp::SetMultiLang { path, value } => set_multilang(submodel, path, value),
        PatchOp::SetFileRef {
            path,
            content_type,
            reference,
        } => set_file_ref(submodel, path, content_type.as_deref(), reference.as_deref()),
        PatchOp::AddListItem { path, value } => {
            add_list_item(submodel, path, value.as_ref(), node_contract)
        }
        PatchOp::RemoveListItem { path, index } => {
            remove_list_item(submodel, path, *index, node_contract)
        }
    }
}

// ── set_value ─────────────────────────────────────────────────────────────

fn set_value(
    submodel: &mut Submodel,
    path: &[PathSegment],
    value: &Value,
) -> Result<(), PatchError> {
    let target = resolve_mut(submodel, path)?;
    match &mut target.body {
        ElementBody::Property { value: slot } => {
            *slot = value.clone();
            Ok(())
        }
        ElementBody::Range { min, max } => {
            let Some(map) = value.as_object() else {
                return Err(UnsupportedOperation::PayloadShape {
                    op: "set_value",
                    path: format_path(path),
                    expected: "an object with 'min' and/or 'max'",
                }
                .into());
            };
            if let Some(new_min) = map.get("min") {
                *min = new_min.clone();
            }
            if let Some(new_max) = map.get("max") {
                *max = new_max.clone();
            }
            Ok(())
        }
        other => Err(UnsupportedOperation::TypeMismatch {
            op: "set_value",
            path: format_path(path),
            expected: "Property or Range",
            actual: other.model_type(),
        }
        .into()),
    }
}

// ── set_multilang ─────────────────────────────────────────────────────────

fn set_multilang(
    submodel: &mut Submodel,
    path: &[PathSegment],
    payload: &Map<String, Value>,
) -> Result<(), PatchError> {
    let entries = lang_entries(payload, "set_multilang", &format_path(path))?;
    let target = resolve_mut(submodel, path)?;
    match &mut target.body {
        ElementBody::MultiLanguageProperty { value } => {
            *value = entries;
            Ok(())
        }
        other => Err(UnsupportedOperation::TypeMismatch {
            op: "set_multilang",
            path: format_path(path),
            expected: "MultiLanguageProperty",
            actual: other.model_type(),
        }
        .into()),
    }
}

/// Turn a language map into canonical entries: empty language codes are
/// dropped, the rest sorted ascending, so the same map always serializes
/// to the same bytes.
fn lang_entries(
    payload: &Map<String, Value>,
    op: &'static str,
    path: &str,
) -> Result<Vec<LangString>, PatchError> {
    let mut entries = Vec::with_capacity(payload.len());
    for (language, text) in payload {
        if language.is_empty() {
            continue;
        }
        let text = text.as_str().ok_or(UnsupportedOperation::PayloadShape {
            op,
            path: path.to_string(),
            expected: "a string per language code",
        })?;
        entries.push(LangString {
            language: language.clone(),
            text: text.to_string(),
        });
    }
    sort_lang_strings(&mut entries);
    Ok(entries)
}

// ── set_file_ref ──────────────────────────────────────────────────────────

fn set_file_ref(
    submodel: &mut Submodel,
    path: &[PathSegment],
    content_type: Option<&str>,
    reference: Option<&str>,
) -> Result<(), PatchError> {
    let target = resolve_mut(submodel, path)?;
    match &mut target.body {
        ElementBody::File {
            content_type: slot,
            value,
        }
        | ElementBody::Blob {
            content_type: slot,
            value,
        } => {
            if let Some(new_content_type) = content_type {
                *slot = Some(new_content_type.to_string());
            }
            if let Some(new_reference) = reference {
                *value = Some(new_reference.to_string());
            }
            Ok(())
        }
        other => Err(UnsupportedOperation::TypeMismatch {
            op: "set_file_ref",
            path: format_path(path),
            expected: "File or Blob",
            actual: other.model_type(),
        }
        .into()),
    }
}

// ── add_list_item ─────────────────────────────────────────────────────────

fn add_list_item(
    submodel: &mut Submodel,
    path: &[PathSegment],
    payload: Option<&Value>,
    contract: Option<&ContractNode>,
) -> Result<(), PatchError> {
    let path_str = format_path(path);
    let target = resolve_mut(submodel, path)?;
    let model_type = target.model_type();
    let ElementBody::List { items } = &mut target.body else {
        return Err(UnsupportedOperation::TypeMismatch {
            op: "add_list_item",
            path: path_str,
            expected: "SubmodelElementList",
            actual: model_type,
        }
        .into());
    };
    if let Some(cardinality) = contract.and_then(|c| c.cardinality()) {
        if !cardinality.allows_add() {
            return Err(ContractViolation::CardinalityForbidsAdd {
                path: path_str,
                cardinality,
            }
            .into());
        }
    }

    // Template: the first sibling, else an empty instance of the item schema.
    let item_schema = contract.and_then(|c| c.items.as_deref());
    let (mut item, template_name) = match items.first() {
        Some(first) => (first.clone(), first.id_short.clone()),
        None => match item_schema {
            Some(schema) => (
                SubmodelElement {
                    id_short: None,
                    body: synthesize_body(schema),
                },
                Some(schema.id_short.clone()).filter(|name| !name.is_empty()),
            ),
            None => {
                return Err(UnsupportedOperation::NoItemTemplate { path: path_str }.into());
            }
        },
    };

    let mut explicit: Option<String> = None;
    if let Some(payload) = payload {
        if let Some(map) = payload.as_object() {
            if let Some(name) = map.get("idShort") {
                let name = name.as_str().ok_or(UnsupportedOperation::PayloadShape {
                    op: "add_list_item",
                    path: path_str.clone(),
                    expected: "a string 'idShort'",
                })?;
                explicit = Some(name.to_string());
            }
            let fields: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| key.as_str() != "idShort")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            if !fields.is_empty() {
                apply_payload(&mut item, &Value::Object(fields), &path_str)?;
            }
        } else {
            apply_payload(&mut item, payload, &path_str)?;
        }
    }

    // A nameless template means a nameless item, unless the caller named it.
    if template_name.is_some() || explicit.is_some() {
        let used: HashSet<String> = items
            .iter()
            .filter_map(|sibling| sibling.id_short.clone())
            .collect();
        let (allowed, rule) = match contract {
            Some(c) => c.item_naming(),
            None => (None, None),
        };
        let policy = NamePolicy::new(allowed, rule, template_name.as_deref());
        let name = policy
            .assign(explicit.as_deref(), &used)
            .map_err(|source| PatchError::Naming {
                path: path_str,
                source,
            })?;
        item.id_short = Some(name);
    } else {
        item.id_short = None;
    }
    items.push(item);
    Ok(())
}

/// Build an empty structural instance of an item schema. Children keep
/// their schema names; the item's own name is assigned afterwards.
fn synthesize_body(schema: &ContractNode) -> ElementBody {
    match schema.model_type {
        ModelType::Property => ElementBody::Property { value: Value::Null },
        ModelType::MultiLanguageProperty => {
            ElementBody::MultiLanguageProperty { value: Vec::new() }
        }
        ModelType::Range => ElementBody::Range {
            min: Value::Null,
            max: Value::Null,
        },
        ModelType::File => ElementBody::File {
            content_type: None,
            value: None,
        },
        ModelType::Blob => ElementBody::Blob {
            content_type: None,
            value: None,
        },
        ModelType::Collection => ElementBody::Collection {
            children: schema.children.iter().map(synthesize_child).collect(),
        },
        ModelType::List => ElementBody::List { items: Vec::new() },
        ModelType::Entity => ElementBody::Entity {
            statements: schema.children.iter().map(synthesize_child).collect(),
        },
        ModelType::Relationship => ElementBody::Relationship {
            first: Value::Null,
            second: Value::Null,
        },
        ModelType::AnnotatedRelationship => ElementBody::AnnotatedRelationship {
            first: Value::Null,
            second: Value::Null,
            annotations: schema.children.iter().map(synthesize_child).collect(),
        },
    }
}

fn synthesize_child(schema: &ContractNode) -> SubmodelElement {
    SubmodelElement {
        id_short: Some(schema.id_short.clone()),
        body: synthesize_body(schema),
    }
}

/// Apply a caller payload onto a freshly built item, recursing into
/// named containers. Payload keys must match existing children; the
/// payload cannot change the item's structure.
fn apply_payload(
    element: &mut SubmodelElement,
    payload: &Value,
    path: &str,
) -> Result<(), PatchError> {
    match &mut element.body {
        ElementBody::Property { value } => {
            *value = payload.clone();
            Ok(())
        }
        ElementBody::MultiLanguageProperty { value } => {
            let map = payload
                .as_object()
                .ok_or(UnsupportedOperation::PayloadShape {
                    op: "add_list_item",
                    path: path.to_string(),
                    expected: "a language map",
                })?;
            *value = lang_entries(map, "add_list_item", path)?;
            Ok(())
        }
        ElementBody::Range { min, max } => {
            let map = payload
                .as_object()
                .ok_or(UnsupportedOperation::PayloadShape {
                    op: "add_list_item",
                    path: path.to_string(),
                    expected: "an object with 'min' and/or 'max'",
                })?;
            if let Some(new_min) = map.get("min") {
                *min = new_min.clone();
            }
            if let Some(new_max) = map.get("max") {
                *max = new_max.clone();
            }
            Ok(())
        }
        ElementBody::File {
            content_type,
            value,
        }
        | ElementBody::Blob {
            content_type,
            value,
        } => {
            let map = payload
                .as_object()
                .ok_or(UnsupportedOperation::PayloadShape {
                    op: "add_list_item",
                    path: path.to_string(),
                    expected: "a file reference object",
                })?;
            if let Some(new_content_type) = map.get("contentType").and_then(Value::as_str) {
                *content_type = Some(new_content_type.to_string());
            }
            if let Some(new_reference) = map
                .get("url")
                .or_else(|| map.get("value"))
                .and_then(Value::as_str)
            {
                *value = Some(new_reference.to_string());
            }
            Ok(())
        }
        ElementBody::Collection { children }
        | ElementBody::Entity {
            statements: children,
        }
        | ElementBody::AnnotatedRelationship {
            annotations: children,
            ..
        } => {
            let map = payload
                .as_object()
                .ok_or(UnsupportedOperation::PayloadShape {
                    op: "add_list_item",
                    path: path.to_string(),
                    expected: "an object of child values",
                })?;
            for (key, child_payload) in map {
                let child_path = format!("{path}/{key}");
                let child = children
                    .iter_mut()
                    .find(|child| child.id_short.as_deref() == Some(key.as_str()))
                    .ok_or_else(|| ResolveError::PathNotFound {
                        path: child_path.clone(),
                        segment: key.clone(),
                    })?;
                apply_payload(child, child_payload, &child_path)?;
            }
            Ok(())
        }
        ElementBody::Relationship { first, second } => {
            let map = payload
                .as_object()
                .ok_or(UnsupportedOperation::PayloadShape {
                    op: "add_list_item",
                    path: path.to_string(),
                    expected: "an object with 'first' and/or 'second'",
                })?;
            if let Some(new_first) = map.get("first") {
                *first = new_first.clone();
            }
            if let Some(new_second) = map.get("second") {
                *second = new_second.clone();
            }
            Ok(())
        }
        ElementBody::List { .. } => Err(UnsupportedOperation::PayloadShape {
            op: "add_list_item",
            path: path.to_string(),
            expected: "no payload for a nested list",
        }
        .into()),
    }
}

// ── remove_list_item ──────────────────────────────────────────────────────

fn remove_list_item(
    submodel: &mut Submodel,
    path: &[PathSegment],
    index: usize,
    contract: Option<&ContractNode>,
) -> Result<(), PatchError> {
    let path_str = format_path(path);
    let target = resolve_mut(submodel, path)?;
    let model_type = target.model_type();
    let ElementBody::List { items } = &mut target.body else {
        return Err(UnsupportedOperation::TypeMismatch {
            op: "remove_list_item",
            path: path_str,
            expected: "SubmodelElementList",
            actual: model_type,
        }
        .into());
    };
    if index >= items.len() {
        return Err(ResolveError::IndexOutOfBounds {
            path: path_str,
            index,
            len: items.len(),
        }
        .into());
    }
    if let Some(cardinality) = contract.and_then(|c| c.cardinality()) {
        if !cardinality.allows_remove_from(items.len()) {
            return Err(ContractViolation::CardinalityForbidsRemove {
                path: path_str,
                cardinality,
            }
            .into());
        }
    }
    items.remove(index);
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────

mod common;

use serde_json::json;

use common::{materials_contract, ops, technical_data};
use submodel_patch::{apply_patch, ElementBody, NamingError, PatchError};

fn item_names(submodel: &submodel_patch::Submodel) -> Vec<String> {
    let materials = submodel.element_by_name("Materials").unwrap();
    let ElementBody::List { items } = &materials.body else {
        panic!("expected list");
    };
    items
        .iter()
        .map(|item| item.id_short.clone().unwrap())
        .collect()
}

#[test]
fn generated_names_continue_the_sibling_sequence() {
    let submodel = technical_data();
    let patch = ops(&[json!({"op": "add_list_item", "path": "Materials"})]);
    let outcome = apply_patch(&submodel, &patch, None, false).unwrap();
    assert_eq!(item_names(&outcome.submodel), ["Item001", "Item002", "Item003"]);
}

#[test]
fn explicit_id_short_in_payload_names_the_item() {
    let submodel = technical_data();
    let patch = ops(&[json!({
        "op": "add_list_item",
        "path": "Materials",
        "value": {"idShort": "Brass", "Name": "Brass"},
    })]);
    let outcome = apply_patch(&submodel, &patch, None, false).unwrap();
    assert_eq!(item_names(&outcome.submodel), ["Item001", "Item002", "Brass"]);
}

#[test]
fn explicit_name_collision_aborts_the_patch() {
    let submodel = technical_data();
    let patch = ops(&[json!({
        "op": "add_list_item",
        "path": "Materials",
        "value": {"idShort": "Item001"},
    })]);
    let err = apply_patch(&submodel, &patch, None, false).unwrap_err();
    let PatchError::Naming { path, source } = err else {
        panic!("expected naming error, got {err:?}");
    };
    assert_eq!(path, "Materials");
    assert_eq!(source, NamingError::Collision { name: "Item001".to_string() });
}

#[test]
fn whitelist_template_drives_generated_names() {
    let submodel = technical_data();
    let contract = materials_contract(json!({
        "cardinality": "ZeroToMany",
        "allowed_id_short": ["Item000", "Marking00"],
    }));
    let patch = ops(&[json!({"op": "add_list_item", "path": "Materials"})]);
    let outcome = apply_patch(&submodel, &patch, Some(&contract), true).unwrap();
    // "Item000" is the first templated entry: it both shapes the counter
    // and admits the generated name.
    assert_eq!(item_names(&outcome.submodel), ["Item001", "Item002", "Item003"]);
}

#[test]
fn whitelist_rejects_explicit_names_outside_the_set() {
    let submodel = technical_data();
    let contract = materials_contract(json!({
        "cardinality": "ZeroToMany",
        "allowed_id_short": ["Item000"],
    }));
    let patch = ops(&[json!({
        "op": "add_list_item",
        "path": "Materials",
        "value": {"idShort": "Brass"},
    })]);
    let err = apply_patch(&submodel, &patch, Some(&contract), true).unwrap_err();
    let PatchError::Naming { source, .. } = err else {
        panic!("expected naming error, got {err:?}");
    };
    assert_eq!(source, NamingError::NotAllowed { name: "Brass".to_string() });
}

#[test]
fn naming_rule_validates_explicit_names() {
    let submodel = technical_data();
    let contract = materials_contract(json!({
        "cardinality": "ZeroToMany",
        "naming": "id_short",
    }));

    let patch = ops(&[json!({
        "op": "add_list_item",
        "path": "Materials",
        "value": {"idShort": "3rdItem"},
    })]);
    let err = apply_patch(&submodel, &patch, Some(&contract), true).unwrap_err();
    let PatchError::Naming { source, .. } = err else {
        panic!("expected naming error, got {err:?}");
    };
    assert!(matches!(source, NamingError::RuleViolation { .. }));

    let patch = ops(&[json!({
        "op": "add_list_item",
        "path": "Materials",
        "value": {"idShort": "ThirdItem"},
    })]);
    let outcome = apply_patch(&submodel, &patch, Some(&contract), true).unwrap();
    assert_eq!(item_names(&outcome.submodel), ["Item001", "Item002", "ThirdItem"]);
}

#[test]
fn regex_naming_rule_gates_generated_names() {
    let submodel = technical_data();
    // Generated names follow the sibling template "Item001", which the
    // rule rejects, so generation-by-template cannot satisfy this
    // contract and the patch must fail rather than invent a name.
    let contract = materials_contract(json!({
        "cardinality": "ZeroToMany",
        "naming": {"pattern": "MAT-[0-9]{3}"},
    }));
    let patch = ops(&[json!({"op": "add_list_item", "path": "Materials"})]);
    let err = apply_patch(&submodel, &patch, Some(&contract), true).unwrap_err();
    assert!(matches!(err, PatchError::Naming { .. }));

    // An explicit rule-conforming name passes.
    let patch = ops(&[json!({
        "op": "add_list_item",
        "path": "Materials",
        "value": {"idShort": "MAT-003"},
    })]);
    let outcome = apply_patch(&submodel, &patch, Some(&contract), true).unwrap();
    assert_eq!(item_names(&outcome.submodel), ["Item001", "Item002", "MAT-003"]);
}

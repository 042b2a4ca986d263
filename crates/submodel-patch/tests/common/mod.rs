#![allow(dead_code)]

use serde_json::{json, Value};

use submodel_patch::codec::json::{contract_from_json, op_from_json, submodel_from_json};
use submodel_patch::{ContractNode, PatchOp, Submodel};

/// A small technical-data submodel covering every addressing mode: a
/// scalar property, a file, a collection with a multi-language child,
/// and a list of collection items.
pub fn technical_data() -> Submodel {
    submodel_from_json(&json!({
        "idShort": "TechnicalData",
        "submodelElements": [
            {"idShort": "Weight", "modelType": "Property", "value": 12.5},
            {"idShort": "Manual", "modelType": "File",
             "contentType": "application/pdf",
             "value": "https://example.com/manual-v1.pdf"},
            {"idShort": "Nameplate", "modelType": "SubmodelElementCollection", "value": [
                {"idShort": "ProductName", "modelType": "MultiLanguageProperty", "value": []},
            ]},
            {"idShort": "Materials", "modelType": "SubmodelElementList", "value": [
                {"idShort": "Item001", "modelType": "SubmodelElementCollection", "value": [
                    {"idShort": "Name", "modelType": "Property", "value": "Steel"},
                ]},
                {"idShort": "Item002", "modelType": "SubmodelElementCollection", "value": [
                    {"idShort": "Name", "modelType": "Property", "value": "Copper"},
                ]},
            ]},
        ],
    }))
    .unwrap()
}

pub fn contract(v: Value) -> ContractNode {
    contract_from_json(&v).unwrap()
}

/// A contract for [`technical_data`] with the given qualifier on the
/// Materials list.
pub fn materials_contract(list_smt: Value) -> ContractNode {
    contract(json!({
        "idShort": "TechnicalData",
        "modelType": "SubmodelElementCollection",
        "children": [
            {"idShort": "Weight", "modelType": "Property"},
            {"idShort": "Manual", "modelType": "File"},
            {"idShort": "Nameplate", "modelType": "SubmodelElementCollection", "children": [
                {"idShort": "ProductName", "modelType": "MultiLanguageProperty"},
            ]},
            {"idShort": "Materials", "modelType": "SubmodelElementList",
             "smt": list_smt,
             "items": {
                "idShort": "Material", "modelType": "SubmodelElementCollection", "children": [
                    {"idShort": "Name", "modelType": "Property"},
                ],
             }},
        ],
    }))
}

pub fn op(v: Value) -> PatchOp {
    op_from_json(&v).unwrap()
}

pub fn ops(list: &[Value]) -> Vec<PatchOp> {
    list.iter().map(|v| op_from_json(v).unwrap()).collect()
}

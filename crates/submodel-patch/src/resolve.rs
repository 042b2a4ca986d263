//! Path resolution through the element tree.
//!
//! A path walks from the submodel root through named child groups and
//! list indices to a single target element. Whether a segment is a name
//! or an index is decided by the node being traversed: lists are
//! index-addressed, every other container is name-addressed, and the two
//! never mix at one depth.

use thiserror::Error;

use submodel_path::{format_path, PathSegment};

use crate::element::{ElementBody, ModelType, Submodel, SubmodelElement};

/// Why a path failed to resolve. `path` is the full path as requested.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no element named '{segment}' in '{path}'")]
    PathNotFound { path: String, segment: String },
    #[error("list segment '{segment}' in '{path}' is not an integer index")]
    InvalidListSegment { path: String, segment: String },
    #[error("index {index} in '{path}' is out of bounds (list has {len} items)")]
    IndexOutOfBounds { path: String, index: usize, len: usize },
    #[error("segment '{segment}' in '{path}' descends into a {model_type} leaf")]
    PathTargetsLeaf {
        path: String,
        segment: String,
        model_type: ModelType,
    },
}

/// Resolve `path` to a mutable reference on the target element.
///
/// Traversal is linear in path length with no backtracking. The first
/// segment must name a root-level element; each later segment steps into
/// the current node according to its type.
pub fn resolve_mut<'a>(
    submodel: &'a mut Submodel,
    path: &[PathSegment],
) -> Result<&'a mut SubmodelElement, ResolveError> {
    let (first, rest) = split_path(path)?;
    let mut current = submodel
        .elements
        .iter_mut()
        .find(|element| element.id_short.as_deref() == Some(first))
        .ok_or_else(|| ResolveError::PathNotFound {
            path: format_path(path),
            segment: first.to_string(),
        })?;
    for segment in rest {
        current = step_into_mut(current, segment, path)?;
    }
    Ok(current)
}

/// Read-only counterpart of [`resolve_mut`].
pub fn resolve<'a>(
    submodel: &'a Submodel,
    path: &[PathSegment],
) -> Result<&'a SubmodelElement, ResolveError> {
    let (first, rest) = split_path(path)?;
    let mut current = submodel
        .element_by_name(first)
        .ok_or_else(|| ResolveError::PathNotFound {
            path: format_path(path),
            segment: first.to_string(),
        })?;
    for segment in rest {
        current = step_into(current, segment, path)?;
    }
    Ok(current)
}

/// The first segment must be a name; the submodel root has no indices.
fn split_path(path: &[PathSegment]) -> Result<(&str, &[PathSegment]), ResolveError> {
    let Some((first, rest)) = path.split_first() else {
        return Err(ResolveError::PathNotFound {
            path: String::new(),
            segment: String::new(),
        });
    };
    match first {
        PathSegment::Name(name) => Ok((name, rest)),
        PathSegment::Index(index) => Err(ResolveError::PathNotFound {
            path: format_path(path),
            segment: index.to_string(),
        }),
    }
}

fn step_into_mut<'a>(
    node: &'a mut SubmodelElement,
    segment: &PathSegment,
    path: &[PathSegment],
) -> Result<&'a mut SubmodelElement, ResolveError> {
    let model_type = node.model_type();
    match &mut node.body {
        ElementBody::List { items } => {
            let index = list_index(segment, path)?;
            let len = items.len();
            items.get_mut(index).ok_or(ResolveError::IndexOutOfBounds {
                path: format_path(path),
                index,
                len,
            })
        }
        ElementBody::Collection { children }
        | ElementBody::Entity { statements: children }
        | ElementBody::AnnotatedRelationship { annotations: children, .. } => {
            let name = child_name(segment, path)?;
            children
                .iter_mut()
                .find(|child| child.id_short.as_deref() == Some(name))
                .ok_or_else(|| ResolveError::PathNotFound {
                    path: format_path(path),
                    segment: name.to_string(),
                })
        }
        _ => Err(ResolveError::PathTargetsLeaf {
            path: format_path(path),
            segment: segment.to_string(),
            model_type,
        }),
    }
}

fn step_into<'a>(
    node: &'a SubmodelElement,
    segment: &PathSegment,
    path: &[PathSegment],
) -> Result<&'a SubmodelElement, ResolveError> {
    let model_type = node.model_type();
    match &node.body {
        ElementBody::List { items } => {
            let index = list_index(segment, path)?;
            items.get(index).ok_or(ResolveError::IndexOutOfBounds {
                path: format_path(path),
                index,
                len: items.len(),
            })
        }
        _ => match node.body.named_children() {
            Some(children) => {
                let name = child_name(segment, path)?;
                children
                    .iter()
                    .find(|child| child.id_short.as_deref() == Some(name))
                    .ok_or_else(|| ResolveError::PathNotFound {
                        path: format_path(path),
                        segment: name.to_string(),
                    })
            }
            None => Err(ResolveError::PathTargetsLeaf {
                path: format_path(path),
                segment: segment.to_string(),
                model_type,
            }),
        },
    }
}

fn list_index(segment: &PathSegment, path: &[PathSegment]) -> Result<usize, ResolveError> {
    match segment {
        PathSegment::Index(index) => Ok(*index),
        PathSegment::Name(name) => Err(ResolveError::InvalidListSegment {
            path: format_path(path),
            segment: name.clone(),
        }),
    }
}

/// A name-addressed container cannot be entered with an index segment;
/// no child can carry a numeric idShort, so this is a plain not-found.
fn child_name<'s>(segment: &'s PathSegment, path: &[PathSegment]) -> Result<&'s str, ResolveError> {
    match segment {
        PathSegment::Name(name) => Ok(name),
        PathSegment::Index(index) => Err(ResolveError::PathNotFound {
            path: format_path(path),
            segment: index.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::LangString;
    use serde_json::json;
    use submodel_path::parse_path;

    fn property(name: &str, value: serde_json::Value) -> SubmodelElement {
        SubmodelElement {
            id_short: Some(name.to_string()),
            body: ElementBody::Property { value },
        }
    }

    fn sample() -> Submodel {
        Submodel {
            id_short: "TechnicalData".to_string(),
            elements: vec![
                property("Weight", json!(12.5)),
                SubmodelElement {
                    id_short: Some("Nameplate".to_string()),
                    body: ElementBody::Collection {
                        children: vec![SubmodelElement {
                            id_short: Some("ManufacturerName".to_string()),
                            body: ElementBody::MultiLanguageProperty {
                                value: vec![LangString {
                                    language: "en".to_string(),
                                    text: "ACME".to_string(),
                                }],
                            },
                        }],
                    },
                },
                SubmodelElement {
                    id_short: Some("Materials".to_string()),
                    body: ElementBody::List {
                        items: vec![
                            SubmodelElement {
                                id_short: Some("Item001".to_string()),
                                body: ElementBody::Collection {
                                    children: vec![property("Name", json!("Steel"))],
                                },
                            },
                        ],
                    },
                },
            ],
        }
    }

    #[test]
    fn resolves_root_level_element() {
        let mut submodel = sample();
        let path = parse_path("Weight").unwrap();
        let target = resolve_mut(&mut submodel, &path).unwrap();
        assert_eq!(target.model_type(), ModelType::Property);
    }

    #[test]
    fn resolves_through_collection_and_list() {
        let mut submodel = sample();
        let path = parse_path("Materials/0/Name").unwrap();
        let target = resolve_mut(&mut submodel, &path).unwrap();
        assert_eq!(target.id_short.as_deref(), Some("Name"));
    }

    #[test]
    fn missing_root_element_is_not_found() {
        let mut submodel = sample();
        let path = parse_path("Height").unwrap();
        let err = resolve_mut(&mut submodel, &path).unwrap_err();
        assert!(matches!(err, ResolveError::PathNotFound { .. }));
    }

    #[test]
    fn named_segment_into_list_is_invalid() {
        let mut submodel = sample();
        let path = parse_path("Materials/First").unwrap();
        let err = resolve_mut(&mut submodel, &path).unwrap_err();
        assert_eq!(
            err,
            ResolveError::InvalidListSegment {
                path: "Materials/First".to_string(),
                segment: "First".to_string(),
            }
        );
    }

    #[test]
    fn list_index_out_of_bounds() {
        let mut submodel = sample();
        let path = parse_path("Materials/5").unwrap();
        let err = resolve_mut(&mut submodel, &path).unwrap_err();
        assert_eq!(
            err,
            ResolveError::IndexOutOfBounds {
                path: "Materials/5".to_string(),
                index: 5,
                len: 1,
            }
        );
    }

    #[test]
    fn descending_into_leaf_fails() {
        let mut submodel = sample();
        let path = parse_path("Weight/Unit").unwrap();
        let err = resolve_mut(&mut submodel, &path).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::PathTargetsLeaf { model_type: ModelType::Property, .. }
        ));
    }

    #[test]
    fn read_only_resolve_matches_mutable_walk() {
        let submodel = sample();
        let path = parse_path("Nameplate/ManufacturerName").unwrap();
        let target = resolve(&submodel, &path).unwrap();
        assert_eq!(target.model_type(), ModelType::MultiLanguageProperty);
    }

    #[test]
    fn empty_path_is_not_found() {
        let mut submodel = sample();
        let err = resolve_mut(&mut submodel, &[]).unwrap_err();
        assert!(matches!(err, ResolveError::PathNotFound { .. }));
    }
}

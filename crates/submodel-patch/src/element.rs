//! Typed submodel element tree.
//!
//! The document being patched is an owned tree of variant nodes, one
//! variant per AAS model type, dispatched by exhaustive match rather than
//! by comparing model type strings.
//!
//! # Element types
//!
//! | Rust variant            | Model type string               | Payload                          |
//! |-------------------------|---------------------------------|----------------------------------|
//! | `Property`              | `Property`                      | scalar value                     |
//! | `MultiLanguageProperty` | `MultiLanguageProperty`         | language strings, sorted         |
//! | `Range`                 | `Range`                         | min / max scalars                |
//! | `File`                  | `File`                          | content type + reference         |
//! | `Blob`                  | `Blob`                          | content type + reference         |
//! | `Collection`            | `SubmodelElementCollection`     | named children                   |
//! | `List`                  | `SubmodelElementList`           | indexed items, names optional    |
//! | `Entity`                | `Entity`                        | named statements                 |
//! | `Relationship`          | `RelationshipElement`           | first / second references        |
//! | `AnnotatedRelationship` | `AnnotatedRelationshipElement`  | references + named annotations   |

use std::fmt;

use serde_json::Value;

// ── Model type ────────────────────────────────────────────────────────────

/// Discriminator for the submodel element variants.
///
/// Used by the codec and in error context; dispatch sites match on
/// [`ElementBody`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    Property,
    MultiLanguageProperty,
    Range,
    File,
    Blob,
    Collection,
    List,
    Entity,
    Relationship,
    AnnotatedRelationship,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Property => "Property",
            ModelType::MultiLanguageProperty => "MultiLanguageProperty",
            ModelType::Range => "Range",
            ModelType::File => "File",
            ModelType::Blob => "Blob",
            ModelType::Collection => "SubmodelElementCollection",
            ModelType::List => "SubmodelElementList",
            ModelType::Entity => "Entity",
            ModelType::Relationship => "RelationshipElement",
            ModelType::AnnotatedRelationship => "AnnotatedRelationshipElement",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Property" => Some(ModelType::Property),
            "MultiLanguageProperty" => Some(ModelType::MultiLanguageProperty),
            "Range" => Some(ModelType::Range),
            "File" => Some(ModelType::File),
            "Blob" => Some(ModelType::Blob),
            "SubmodelElementCollection" => Some(ModelType::Collection),
            "SubmodelElementList" => Some(ModelType::List),
            "Entity" => Some(ModelType::Entity),
            "RelationshipElement" => Some(ModelType::Relationship),
            "AnnotatedRelationshipElement" => Some(ModelType::AnnotatedRelationship),
            _ => None,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Language strings ──────────────────────────────────────────────────────

/// One (language code, text) pair of a multi-language property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangString {
    pub language: String,
    pub text: String,
}

/// Sort language strings ascending by language code.
///
/// Multi-language values are stored in this canonical order wherever they
/// enter the tree, so serializing the same document always produces the
/// same bytes.
pub fn sort_lang_strings(values: &mut [LangString]) {
    values.sort_by(|a, b| a.language.cmp(&b.language));
}

// ── Element tree ──────────────────────────────────────────────────────────

/// The root of a patchable document: a named submodel with its elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Submodel {
    pub id_short: String,
    pub elements: Vec<SubmodelElement>,
}

impl Submodel {
    /// Find a root-level element by idShort.
    pub fn element_by_name(&self, name: &str) -> Option<&SubmodelElement> {
        self.elements
            .iter()
            .find(|element| element.id_short.as_deref() == Some(name))
    }
}

/// A node of the submodel tree: an optional idShort plus a typed payload.
///
/// List items are the only elements whose idShort may be absent.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmodelElement {
    pub id_short: Option<String>,
    pub body: ElementBody,
}

impl SubmodelElement {
    pub fn model_type(&self) -> ModelType {
        self.body.model_type()
    }
}

/// Per-type payload of a submodel element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementBody {
    Property {
        value: Value,
    },
    MultiLanguageProperty {
        /// Sorted ascending by language code.
        value: Vec<LangString>,
    },
    Range {
        min: Value,
        max: Value,
    },
    File {
        content_type: Option<String>,
        value: Option<String>,
    },
    Blob {
        content_type: Option<String>,
        value: Option<String>,
    },
    Collection {
        children: Vec<SubmodelElement>,
    },
    List {
        items: Vec<SubmodelElement>,
    },
    Entity {
        statements: Vec<SubmodelElement>,
    },
    Relationship {
        first: Value,
        second: Value,
    },
    AnnotatedRelationship {
        first: Value,
        second: Value,
        annotations: Vec<SubmodelElement>,
    },
}

impl ElementBody {
    pub fn model_type(&self) -> ModelType {
        match self {
            ElementBody::Property { .. } => ModelType::Property,
            ElementBody::MultiLanguageProperty { .. } => ModelType::MultiLanguageProperty,
            ElementBody::Range { .. } => ModelType::Range,
            ElementBody::File { .. } => ModelType::File,
            ElementBody::Blob { .. } => ModelType::Blob,
            ElementBody::Collection { .. } => ModelType::Collection,
            ElementBody::List { .. } => ModelType::List,
            ElementBody::Entity { .. } => ModelType::Entity,
            ElementBody::Relationship { .. } => ModelType::Relationship,
            ElementBody::AnnotatedRelationship { .. } => ModelType::AnnotatedRelationship,
        }
    }

    /// The named child group of a container, if this is a container type.
    ///
    /// Collections expose children, entities expose statements, annotated
    /// relationships expose annotations. Lists are index-addressed and
    /// return `None`.
    pub fn named_children(&self) -> Option<&[SubmodelElement]> {
        match self {
            ElementBody::Collection { children } => Some(children),
            ElementBody::Entity { statements } => Some(statements),
            ElementBody::AnnotatedRelationship { annotations, .. } => Some(annotations),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_type_strings_round_trip() {
        for mt in [
            ModelType::Property,
            ModelType::MultiLanguageProperty,
            ModelType::Range,
            ModelType::File,
            ModelType::Blob,
            ModelType::Collection,
            ModelType::List,
            ModelType::Entity,
            ModelType::Relationship,
            ModelType::AnnotatedRelationship,
        ] {
            assert_eq!(ModelType::from_str(mt.as_str()), Some(mt));
        }
        assert_eq!(ModelType::from_str("Submodel"), None);
    }

    #[test]
    fn sort_lang_strings_orders_by_language() {
        let mut values = vec![
            LangString { language: "en".to_string(), text: "Hello".to_string() },
            LangString { language: "de".to_string(), text: "Hallo".to_string() },
        ];
        sort_lang_strings(&mut values);
        assert_eq!(values[0].language, "de");
        assert_eq!(values[1].language, "en");
    }

    #[test]
    fn element_by_name_finds_root_children() {
        let submodel = Submodel {
            id_short: "TechnicalData".to_string(),
            elements: vec![SubmodelElement {
                id_short: Some("Weight".to_string()),
                body: ElementBody::Property { value: json!(12.5) },
            }],
        };
        assert!(submodel.element_by_name("Weight").is_some());
        assert!(submodel.element_by_name("Height").is_none());
    }

    #[test]
    fn named_children_only_for_containers() {
        let collection = ElementBody::Collection { children: vec![] };
        assert!(collection.named_children().is_some());

        let list = ElementBody::List { items: vec![] };
        assert!(list.named_children().is_none());

        let property = ElementBody::Property { value: Value::Null };
        assert!(property.named_children().is_none());
    }
}

//! Contract types and the flattened contract index.
//!
//! A contract mirrors the shape of the submodel it governs but carries
//! schema metadata (mutability, cardinality, naming policy) instead of
//! values. The engine consumes contracts read-only; they are produced by
//! an external template service.

use std::fmt;

use indexmap::IndexMap;
use submodel_path::{normalize_path, PathSegment, INDEX_PLACEHOLDER};

use crate::element::ModelType;

// ── Qualifier values ──────────────────────────────────────────────────────

/// Mutability of a contract node. Defaults to `ReadWrite` when the
/// qualifier is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    ReadOnly,
    #[default]
    ReadWrite,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "ReadOnly",
            AccessMode::ReadWrite => "ReadWrite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ReadOnly" => Some(AccessMode::ReadOnly),
            "ReadWrite" => Some(AccessMode::ReadWrite),
            _ => None,
        }
    }
}

/// How many instances of a repeatable element are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    ZeroToOne,
    OneToMany,
    ZeroToMany,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::One => "One",
            Cardinality::ZeroToOne => "ZeroToOne",
            Cardinality::OneToMany => "OneToMany",
            Cardinality::ZeroToMany => "ZeroToMany",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "One" => Some(Cardinality::One),
            "ZeroToOne" => Some(Cardinality::ZeroToOne),
            "OneToMany" => Some(Cardinality::OneToMany),
            "ZeroToMany" => Some(Cardinality::ZeroToMany),
            _ => None,
        }
    }

    /// Whether a list governed by this cardinality may grow.
    pub fn allows_add(&self) -> bool {
        matches!(self, Cardinality::OneToMany | Cardinality::ZeroToMany)
    }

    /// Whether a list of `len` items may lose one.
    pub fn allows_remove_from(&self, len: usize) -> bool {
        match self {
            Cardinality::One | Cardinality::OneToMany => len > 1,
            Cardinality::ZeroToOne | Cardinality::ZeroToMany => true,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule governing what an element name may look like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingRule {
    /// Any non-empty name.
    FreeForm,
    /// idShort-shaped: a letter followed by letters, digits, underscores.
    Identifier,
    /// An explicit regex the whole name must match.
    Pattern(String),
}

impl fmt::Display for NamingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingRule::FreeForm => f.write_str("free"),
            NamingRule::Identifier => f.write_str("idShort"),
            NamingRule::Pattern(pattern) => write!(f, "pattern '{pattern}'"),
        }
    }
}

/// Schema metadata attached to a contract node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SmtQualifier {
    pub access_mode: AccessMode,
    pub cardinality: Option<Cardinality>,
    pub allowed_id_short: Option<Vec<String>>,
    pub naming: Option<NamingRule>,
}

// ── Contract tree ─────────────────────────────────────────────────────────

/// One node of a contract: the schema counterpart of a submodel element.
///
/// `children` holds whichever named child group the source carried
/// (children, statements, or annotations; the index does not care which);
/// `items` is the single schema governing every item of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractNode {
    pub id_short: String,
    pub model_type: ModelType,
    pub smt: Option<SmtQualifier>,
    pub children: Vec<ContractNode>,
    pub items: Option<Box<ContractNode>>,
}

impl ContractNode {
    pub fn access_mode(&self) -> AccessMode {
        self.smt
            .as_ref()
            .map(|smt| smt.access_mode)
            .unwrap_or_default()
    }

    pub fn cardinality(&self) -> Option<Cardinality> {
        self.smt.as_ref().and_then(|smt| smt.cardinality)
    }

    /// Naming constraints governing this node's list items.
    ///
    /// The item schema's qualifier wins per field; the list node's own
    /// qualifier is the fallback.
    pub fn item_naming(&self) -> (Option<&[String]>, Option<&NamingRule>) {
        let item_smt = self.items.as_ref().and_then(|items| items.smt.as_ref());
        let own_smt = self.smt.as_ref();
        let allowed = item_smt
            .and_then(|smt| smt.allowed_id_short.as_deref())
            .or_else(|| own_smt.and_then(|smt| smt.allowed_id_short.as_deref()));
        let naming = item_smt
            .and_then(|smt| smt.naming.as_ref())
            .or_else(|| own_smt.and_then(|smt| smt.naming.as_ref()));
        (allowed, naming)
    }
}

// ── Contract index ────────────────────────────────────────────────────────

/// Flattening of a contract tree into `normalized path → node`.
///
/// List item schemas register under the `[]` placeholder, so lookups for
/// `Materials/0/Name` and `Materials/7/Name` land on the same entry. An
/// empty index (no contract supplied) makes every lookup miss, which
/// disables mutability checking.
#[derive(Debug, Default)]
pub struct ContractIndex<'a> {
    entries: IndexMap<String, &'a ContractNode>,
}

impl<'a> ContractIndex<'a> {
    /// Flatten `root` by depth-first walk. The root node itself stands for
    /// the submodel and gets no entry; paths start at its children.
    pub fn build(root: &'a ContractNode) -> Self {
        let mut entries = IndexMap::new();
        for child in &root.children {
            Self::register(child, child.id_short.clone(), &mut entries);
        }
        ContractIndex { entries }
    }

    fn register(
        node: &'a ContractNode,
        key: String,
        entries: &mut IndexMap<String, &'a ContractNode>,
    ) {
        for child in &node.children {
            Self::register(child, format!("{key}/{}", child.id_short), entries);
        }
        if let Some(items) = &node.items {
            Self::register(items, format!("{key}/{INDEX_PLACEHOLDER}"), entries);
        }
        entries.insert(key, node);
    }

    /// Look up the contract node governing `path`, normalizing concrete
    /// indices to the placeholder first.
    pub fn lookup(&self, path: &[PathSegment]) -> Option<&'a ContractNode> {
        self.entries.get(&normalize_path(path)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

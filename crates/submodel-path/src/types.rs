//! Type definitions for idShort paths.

use std::fmt;

/// A single segment of an idShort path.
///
/// Named segments address children of collections, entities, and
/// annotation groups; index segments address items of submodel element
/// lists. Which interpretation applies is decided by the node being
/// traversed, not by the segment itself, but idShort syntax forbids
/// purely numeric names, so the parse is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An element name (idShort).
    Name(String),
    /// A zero-based list index.
    Index(usize),
}

impl PathSegment {
    /// Returns the element name if this is a named segment.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PathSegment::Name(name) => Some(name),
            PathSegment::Index(_) => None,
        }
    }

    /// Returns the list index if this is an index segment.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Name(_) => None,
            PathSegment::Index(idx) => Some(*idx),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Name(name) => f.write_str(name),
            PathSegment::Index(idx) => write!(f, "{idx}"),
        }
    }
}

/// An idShort path: the parsed form of `"Segment/Segment/0/Segment"`.
pub type ElementPath = Vec<PathSegment>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_accessors() {
        let name = PathSegment::Name("Weight".to_string());
        assert_eq!(name.as_name(), Some("Weight"));
        assert_eq!(name.as_index(), None);

        let index = PathSegment::Index(3);
        assert_eq!(index.as_name(), None);
        assert_eq!(index.as_index(), Some(3));
    }

    #[test]
    fn segment_display() {
        assert_eq!(PathSegment::Name("Materials".to_string()).to_string(), "Materials");
        assert_eq!(PathSegment::Index(0).to_string(), "0");
    }
}

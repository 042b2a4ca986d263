//! idShort path utilities for AAS submodel trees.
//!
//! A submodel element is addressed by a slash-delimited path of element
//! names and, where the path crosses a submodel element list, zero-based
//! integer indices: `"Materials/0/Name"`.
//!
//! # Example
//!
//! ```
//! use submodel_path::{parse_path, format_path, normalize_path, PathSegment};
//!
//! // Parse a path string into segments
//! let path = parse_path("Materials/0/Name").unwrap();
//! assert_eq!(path, vec![
//!     PathSegment::Name("Materials".to_string()),
//!     PathSegment::Index(0),
//!     PathSegment::Name("Name".to_string()),
//! ]);
//!
//! // Format segments back to a path string
//! assert_eq!(format_path(&path), "Materials/0/Name");
//!
//! // Normalize indices to the `[]` placeholder used by schema lookups
//! assert_eq!(normalize_path(&path), "Materials/[]/Name");
//! ```

pub mod types;
pub use types::{ElementPath, PathSegment};

pub mod validate;
pub use validate::{validate_path, PathError};

/// The placeholder that stands in for a concrete list index in a
/// normalized path. A single item schema governs every index of a list,
/// so schema lookups key on `Materials/[]/Name` rather than
/// `Materials/0/Name`.
pub const INDEX_PLACEHOLDER: &str = "[]";

/// Parse an idShort path string into segments.
///
/// - A single leading `/` is tolerated and stripped
/// - Purely numeric segments parse as [`PathSegment::Index`] (idShort
///   syntax forbids numeric names, so this is unambiguous)
/// - The path is validated first; see [`validate_path`]
///
/// # Example
///
/// ```
/// use submodel_path::{parse_path, PathSegment};
///
/// let path = parse_path("Nameplate/ManufacturerName").unwrap();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path[0].as_name(), Some("Nameplate"));
///
/// assert_eq!(parse_path("Materials/2").unwrap()[1], PathSegment::Index(2));
/// assert!(parse_path("").is_err());
/// ```
pub fn parse_path(path: &str) -> Result<ElementPath, PathError> {
    validate_path(path)?;
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    Ok(trimmed.split('/').map(parse_segment).collect())
}

/// Parse a single path segment.
///
/// Leading-zero forms such as `"007"` are numeric and parse as indices.
fn parse_segment(segment: &str) -> PathSegment {
    if segment.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(index) = segment.parse::<usize>() {
            return PathSegment::Index(index);
        }
    }
    PathSegment::Name(segment.to_string())
}

/// Format path segments into an idShort path string.
///
/// # Example
///
/// ```
/// use submodel_path::{format_path, PathSegment};
///
/// let path = vec![
///     PathSegment::Name("Materials".to_string()),
///     PathSegment::Index(1),
/// ];
/// assert_eq!(format_path(&path), "Materials/1");
/// assert_eq!(format_path(&[]), "");
/// ```
pub fn format_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        out.push_str(&segment.to_string());
    }
    out
}

/// Format path segments into the normalized form used for schema lookups:
/// every index segment becomes the [`INDEX_PLACEHOLDER`].
///
/// # Example
///
/// ```
/// use submodel_path::{normalize_path, parse_path};
///
/// let path = parse_path("Materials/4/Name").unwrap();
/// assert_eq!(normalize_path(&path), "Materials/[]/Name");
/// ```
pub fn normalize_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        match segment {
            PathSegment::Name(name) => out.push_str(name),
            PathSegment::Index(_) => out.push_str(INDEX_PLACEHOLDER),
        }
    }
    out
}

/// Check if `parent` path is a proper prefix of the `child` path.
///
/// # Example
///
/// ```
/// use submodel_path::{is_child, parse_path};
///
/// let parent = parse_path("Materials").unwrap();
/// let child = parse_path("Materials/0").unwrap();
/// assert!(is_child(&parent, &child));
/// assert!(!is_child(&child, &parent));
/// ```
pub fn is_child(parent: &[PathSegment], child: &[PathSegment]) -> bool {
    if parent.len() >= child.len() {
        return false;
    }
    parent.iter().zip(child.iter()).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mixed_path() {
        let path = parse_path("Materials/0/Name").unwrap();
        assert_eq!(
            path,
            vec![
                PathSegment::Name("Materials".to_string()),
                PathSegment::Index(0),
                PathSegment::Name("Name".to_string()),
            ]
        );
    }

    #[test]
    fn parse_strips_leading_slash() {
        assert_eq!(parse_path("/Weight").unwrap(), parse_path("Weight").unwrap());
    }

    #[test]
    fn parse_leading_zero_index() {
        assert_eq!(parse_path("Materials/007").unwrap()[1], PathSegment::Index(7));
    }

    #[test]
    fn format_round_trip() {
        for input in ["Weight", "Materials/0/Name", "Documents/12/DigitalFile"] {
            let path = parse_path(input).unwrap();
            assert_eq!(format_path(&path), input);
        }
    }

    #[test]
    fn normalize_replaces_every_index() {
        let path = parse_path("Documents/3/Translations/0/Text").unwrap();
        assert_eq!(normalize_path(&path), "Documents/[]/Translations/[]/Text");
    }

    #[test]
    fn normalize_without_indices_is_identity() {
        let path = parse_path("Nameplate/ManufacturerName").unwrap();
        assert_eq!(normalize_path(&path), "Nameplate/ManufacturerName");
    }
}

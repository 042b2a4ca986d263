//! Validation functions for idShort path strings.

use thiserror::Error;

/// Maximum allowed path string length.
const MAX_PATH_LENGTH: usize = 1024;

/// Maximum allowed path depth.
const MAX_PATH_DEPTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path exceeds {MAX_PATH_LENGTH} characters")]
    TooLong,
    #[error("path exceeds {MAX_PATH_DEPTH} segments")]
    TooDeep,
    #[error("empty segment at position {0}")]
    EmptySegment(usize),
}

/// Validate an idShort path string before parsing.
///
/// # Errors
///
/// Returns an error if:
/// - The path is empty (a patch must target some element)
/// - The path exceeds the maximum length (1024 characters)
/// - Any segment between separators is empty (`"a//b"`, `"a/"`)
///
/// # Example
///
/// ```
/// use submodel_path::validate_path;
///
/// validate_path("Nameplate/ManufacturerName").unwrap();
/// validate_path("Materials/0/Name").unwrap();
/// validate_path("").unwrap_err();
/// validate_path("Materials//Name").unwrap_err();
/// ```
pub fn validate_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if path.len() > MAX_PATH_LENGTH {
        return Err(PathError::TooLong);
    }
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }
    let mut depth = 0usize;
    for (position, segment) in trimmed.split('/').enumerate() {
        if segment.is_empty() {
            return Err(PathError::EmptySegment(position));
        }
        depth += 1;
    }
    if depth > MAX_PATH_DEPTH {
        return Err(PathError::TooDeep);
    }
    Ok(())
}

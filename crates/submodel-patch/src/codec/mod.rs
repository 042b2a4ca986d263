//! JSON codec for operations, documents, and contracts.

pub mod json;

//! Error types for the DOT renderer.

use objtree_core::{TreeError, TypeNodeId, ValueNodeId};
use thiserror::Error;

/// Errors produced while rendering a tree.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The tree failed validation.
    #[error("invalid tree: {0}")]
    InvalidTree(#[from] TreeError),

    /// A value refers to a type missing from the catalog.
    #[error("value {value} has unknown type {ty}")]
    UnknownType { value: ValueNodeId, ty: TypeNodeId },
}

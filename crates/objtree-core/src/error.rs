//! Error types for objtree-core.
//!
//! Extraction itself never fails: unreadable values degrade to opaque leaves.
//! These errors cover trees read back from JSON, where the graph invariants
//! can no longer be taken for granted.

use thiserror::Error;

use crate::id::{TypeNodeId, ValueNodeId};

#[derive(Debug, Error)]
pub enum TreeError {
    /// The input is not a serialized tree.
    #[error("invalid tree json: {0}")]
    Json(#[from] serde_json::Error),

    /// Type ids must be `0..n` in published order.
    #[error("type ids out of sequence: expected {expected}, found {found}")]
    TypeIdSequence { expected: TypeNodeId, found: TypeNodeId },

    /// Value ids must be `0..n` in published order.
    #[error("value ids out of sequence: expected {expected}, found {found}")]
    ValueIdSequence { expected: ValueNodeId, found: ValueNodeId },

    #[error("value {value} has unknown type {ty}")]
    UnknownType { value: ValueNodeId, ty: TypeNodeId },

    #[error("value {value} element '{key}' references missing value {target}")]
    DanglingValue {
        value: ValueNodeId,
        key: String,
        target: ValueNodeId,
    },

    #[error("type {ty} element '{key}' references missing type {target}")]
    DanglingType {
        ty: TypeNodeId,
        key: String,
        target: TypeNodeId,
    },

    /// The catalog holds canonical types only.
    #[error("type {ty} has kind pointer")]
    PointerType { ty: TypeNodeId },

    #[error("value {value} has flags for '{key}' but no such element")]
    OrphanFlags { value: ValueNodeId, key: String },
}

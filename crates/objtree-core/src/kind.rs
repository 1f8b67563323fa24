//! Kind tags for introspected types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural classification of a type.
///
/// `Pointer` is only ever produced by the introspection layer; the type
/// catalog strips pointer indirection, so a published
/// [`TypeNode`](crate::tree::TypeNode) never carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Primitive,
    Struct,
    Map,
    Slice,
    Array,
    Interface,
    Function,
    Pointer,
    Other,
}

impl Kind {
    /// Returns `true` for maps, slices and arrays.
    pub fn is_collection(self) -> bool {
        matches!(self, Kind::Map | Kind::Slice | Kind::Array)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Primitive => "primitive",
            Kind::Struct => "struct",
            Kind::Map => "map",
            Kind::Slice => "slice",
            Kind::Array => "array",
            Kind::Interface => "interface",
            Kind::Function => "function",
            Kind::Pointer => "pointer",
            Kind::Other => "other",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

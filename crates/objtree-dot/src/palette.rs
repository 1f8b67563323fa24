//! Colors used by the renderer.

use objtree_core::Kind;
use serde::{Deserialize, Serialize};

/// Fill colors per kind, plus the cluster background and muted label color.
///
/// Deserializes from a partial table; missing entries keep their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub interface: String,
    #[serde(rename = "struct")]
    pub structure: String,
    pub map: String,
    pub slice: String,
    pub array: String,
    pub function: String,
    /// Primitives and anything without a color of its own.
    pub other: String,
    /// Background of struct clusters.
    pub cluster: String,
    /// Label color of anonymous-field edges.
    pub muted: String,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            interface: "#A6E7FF".into(),
            structure: "#CCFF00".into(),
            map: "#FFFF38".into(),
            slice: "#FBAED2".into(),
            array: "#FBAED2".into(),
            function: "#FF9933".into(),
            other: "#FBE7B2".into(),
            cluster: "#f2fff2".into(),
            muted: "#888888".into(),
        }
    }
}

impl Palette {
    pub fn color(&self, kind: Kind) -> &str {
        match kind {
            Kind::Interface => &self.interface,
            Kind::Struct => &self.structure,
            Kind::Map => &self.map,
            Kind::Slice => &self.slice,
            Kind::Array => &self.array,
            Kind::Function => &self.function,
            Kind::Primitive | Kind::Pointer | Kind::Other => &self.other,
        }
    }
}

//! The immutable output of an extraction: a type catalog and a value table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::flags::EdgeFlags;
use crate::id::{TypeNodeId, ValueNodeId};
use crate::kind::Kind;

/// One distinct canonical type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNode {
    pub id: TypeNodeId,
    pub kind: Kind,
    /// Module path of the declaring module; empty for built-in and anonymous types.
    pub package: String,
    pub name: String,
    #[serde(rename = "string")]
    pub display: String,
    /// Member key (field, method, `""` for element types) -> child type.
    pub elements: IndexMap<String, TypeNodeId>,
    /// Struct field -> whether it is an anonymous (tuple-position) field.
    pub anonymous: IndexMap<String, bool>,
    /// Member key (`""` for the type itself) -> documentation.
    pub docs: IndexMap<String, String>,
}

impl TypeNode {
    /// `package::Name` for nominal types, the display string otherwise.
    pub fn full_name(&self) -> String {
        crate::describe::full_name(&self.package, &self.name, &self.display)
    }

    /// Documentation of `member`, empty when none was found.
    pub fn doc(&self, member: &str) -> &str {
        self.docs.get(member).map(String::as_str).unwrap_or("")
    }

    pub fn is_anonymous(&self, member: &str) -> bool {
        self.anonymous.get(member).copied().unwrap_or(false)
    }
}

/// One distinct live value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueNode {
    pub id: ValueNodeId,
    #[serde(rename = "type")]
    pub ty: TypeNodeId,
    /// Number of references that resolved to this value.
    pub referred: u32,
    pub elements: IndexMap<String, ValueNodeId>,
    /// How each element edge was reached.
    pub flags: IndexMap<String, EdgeFlags>,
}

impl ValueNode {
    pub fn flags(&self, key: &str) -> EdgeFlags {
        self.flags.get(key).copied().unwrap_or_default()
    }
}

/// Extraction result: values and types, each sorted by id.
///
/// The first value is the root, unless the root was a nil pointer, in which
/// case the tree is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub values: Vec<ValueNode>,
    pub types: Vec<TypeNode>,
}

impl Tree {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn root(&self) -> Option<&ValueNode> {
        self.values.first()
    }

    pub fn value(&self, id: ValueNodeId) -> Option<&ValueNode> {
        match self.values.get(id.index()) {
            Some(node) if node.id == id => Some(node),
            _ => self.values.iter().find(|node| node.id == id),
        }
    }

    pub fn type_node(&self, id: TypeNodeId) -> Option<&TypeNode> {
        match self.types.get(id.index()) {
            Some(node) if node.id == id => Some(node),
            _ => self.types.iter().find(|node| node.id == id),
        }
    }

    /// Type of a value node.
    pub fn type_of(&self, value: &ValueNode) -> Option<&TypeNode> {
        self.type_node(value.ty)
    }

    /// Largest `referred` count over all values, at least 1.
    pub fn max_referred(&self) -> u32 {
        self.values.iter().map(|v| v.referred).max().unwrap_or(0).max(1)
    }

    /// Number of value-to-value edges.
    pub fn edge_count(&self) -> usize {
        self.values.iter().map(|v| v.elements.len()).sum()
    }

    /// Checks the structural invariants of the tree.
    ///
    /// Trees produced by [`extract`](crate::extract) always pass; trees read
    /// from JSON may not.
    pub fn validate(&self) -> Result<(), TreeError> {
        for (index, ty) in self.types.iter().enumerate() {
            let expected = TypeNodeId(index as u32);
            if ty.id != expected {
                return Err(TreeError::TypeIdSequence { expected, found: ty.id });
            }
            if ty.kind == Kind::Pointer {
                return Err(TreeError::PointerType { ty: ty.id });
            }
        }
        for ty in &self.types {
            for (key, &target) in &ty.elements {
                if target.index() >= self.types.len() {
                    return Err(TreeError::DanglingType {
                        ty: ty.id,
                        key: key.clone(),
                        target,
                    });
                }
            }
        }

        for (index, value) in self.values.iter().enumerate() {
            let expected = ValueNodeId(index as u32);
            if value.id != expected {
                return Err(TreeError::ValueIdSequence {
                    expected,
                    found: value.id,
                });
            }
        }
        for value in &self.values {
            if value.ty.index() >= self.types.len() {
                return Err(TreeError::UnknownType {
                    value: value.id,
                    ty: value.ty,
                });
            }
            for (key, &target) in &value.elements {
                if target.index() >= self.values.len() {
                    return Err(TreeError::DanglingValue {
                        value: value.id,
                        key: key.clone(),
                        target,
                    });
                }
            }
            if let Some(key) = value.flags.keys().find(|k| !value.elements.contains_key(*k)) {
                return Err(TreeError::OrphanFlags {
                    value: value.id,
                    key: key.clone(),
                });
            }
        }
        Ok(())
    }

    /// Content hash of the canonical JSON form.
    ///
    /// Element maps keep insertion order, so equal trees hash equally.
    pub fn fingerprint(&self) -> blake3::Hash {
        let bytes = serde_json::to_vec(self).expect("Tree serialization should never fail");
        blake3::hash(&bytes)
    }

    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a serialized tree.
    pub fn from_json(json: &str) -> Result<Tree, TreeError> {
        let tree: Tree = serde_json::from_str(json)?;
        tree.validate()?;
        Ok(tree)
    }
}

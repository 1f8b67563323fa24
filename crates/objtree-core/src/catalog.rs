//! Type Catalog Builder: one [`TypeNode`] per canonical type.
//!
//! Entries are inserted before their members are resolved, so a type that
//! refers to itself (directly or through pointers and collections) finds its
//! own half-built entry and terminates.

use std::any::TypeId;
use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::trace;

use crate::describe::TypeRef;
use crate::docs::DocLookup;
use crate::id::TypeNodeId;
use crate::kind::Kind;
use crate::tree::TypeNode;

pub(crate) struct TypeCatalog<'d> {
    docs: &'d dyn DocLookup,
    /// Canonical keys, and every pointer key already stripped to one.
    index: HashMap<TypeId, TypeNodeId>,
    /// Nodes by id.
    nodes: Vec<TypeNode>,
    /// Canonical key of each node, by id.
    keys: Vec<TypeId>,
}

impl<'d> TypeCatalog<'d> {
    pub fn new(docs: &'d dyn DocLookup) -> Self {
        TypeCatalog {
            docs,
            index: HashMap::new(),
            nodes: Vec::new(),
            keys: Vec::new(),
        }
    }

    /// Returns the id of the canonical form of `ty`, cataloging it (and
    /// everything it mentions) on first sight.
    pub fn resolve(&mut self, ty: TypeRef) -> TypeNodeId {
        if let Some(&id) = self.index.get(&ty.key()) {
            return id;
        }
        let desc = ty.canonical();
        if let Some(&id) = self.index.get(&desc.key) {
            self.index.insert(ty.key(), id);
            return id;
        }

        let id = TypeNodeId(self.nodes.len() as u32);
        self.index.insert(desc.key, id);
        self.index.insert(ty.key(), id);
        self.keys.push(desc.key);

        let mut docs = IndexMap::new();
        docs.insert(String::new(), self.docs.lookup(&desc, "").unwrap_or_default());

        // A pointer without a pointee cannot be stripped further.
        let kind = match desc.kind {
            Kind::Pointer => Kind::Other,
            kind => kind,
        };
        trace!(id = %id, ty = %desc.display, "catalog type");
        self.nodes.push(TypeNode {
            id,
            kind,
            package: desc.package.to_string(),
            name: desc.name.to_string(),
            display: desc.display.to_string(),
            elements: IndexMap::new(),
            anonymous: IndexMap::new(),
            docs,
        });

        for member in &desc.members {
            let child = self.resolve(member.ty);
            let doc = match kind {
                Kind::Struct | Kind::Interface => {
                    Some(self.docs.lookup(&desc, &member.name).unwrap_or_default())
                }
                _ => None,
            };

            let node = &mut self.nodes[id.index()];
            node.elements.insert(member.name.to_string(), child);
            if let Some(doc) = doc {
                node.docs.insert(member.name.to_string(), doc);
            }
            if kind == Kind::Struct {
                node.anonymous.insert(member.name.to_string(), member.anonymous);
            }
        }
        id
    }

    pub fn node(&self, id: TypeNodeId) -> &TypeNode {
        &self.nodes[id.index()]
    }

    pub fn key(&self, id: TypeNodeId) -> TypeId {
        self.keys[id.index()]
    }

    /// Published sequence, ascending by id.
    pub fn finish(self) -> Vec<TypeNode> {
        self.nodes
    }
}

//! Value Graph Builder: one [`ValueNode`] per distinct live value.
//!
//! Values are memoized by [`Identity`] after stripping pointer indirection,
//! and inserted before their children are visited, so cyclic object graphs
//! terminate and shared storage collapses to a single node. Whether a value's
//! children are visited at all is decided by the [`ExpansionPolicy`].
//! Zero-sized values are never memoized; each reference gets its own node.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::catalog::TypeCatalog;
use crate::describe::TypeDesc;
use crate::flags::EdgeFlags;
use crate::id::{TypeNodeId, ValueNodeId};
use crate::inspect::{deref, Identity, Inspect, View};
use crate::kind::Kind;
use crate::options::ExtractOptions;
use crate::tree::{Tree, ValueNode};

/// Extracts the type catalog and value table reachable from `root`.
///
/// A nil root yields an empty tree. Every call starts from fresh tables.
pub fn extract(root: &dyn Inspect, options: &ExtractOptions) -> Tree {
    let mut builder = ValueGraphBuilder::new(options);
    builder.policy.admit_root(root.type_ref().canonical());
    builder.resolve(root, true, 0);
    builder.finish()
}

/// Decides which composite types have their contents traversed.
#[derive(Debug, Clone, Default)]
pub struct ExpansionPolicy {
    packages: Vec<String>,
    types: HashSet<TypeId>,
}

impl ExpansionPolicy {
    pub fn new(options: &ExtractOptions) -> Self {
        ExpansionPolicy {
            packages: options.expand_packages.clone(),
            types: options.expand_types.clone(),
        }
    }

    /// Whitelists the root's canonical type and, when it has one, its package.
    fn admit_root(&mut self, root: TypeDesc) {
        self.types.insert(root.key);
        if !root.package.is_empty() && !self.covers_package(&root.package) {
            self.packages.push(root.package.into_owned());
        }
    }

    /// `true` when `key` is whitelisted or `package` lies under a whitelisted
    /// module path.
    pub fn covers(&self, key: TypeId, package: &str) -> bool {
        self.types.contains(&key) || self.covers_package(package)
    }

    fn covers_package(&self, package: &str) -> bool {
        !package.is_empty()
            && self.packages.iter().any(|prefix| {
                package == prefix
                    || package
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
    }
}

struct ValueGraphBuilder<'o> {
    options: &'o ExtractOptions,
    policy: ExpansionPolicy,
    catalog: TypeCatalog<'o>,
    index: HashMap<Identity, ValueNodeId>,
    /// Nodes by id.
    nodes: Vec<ValueNode>,
    depth_warned: bool,
    nodes_warned: bool,
}

impl<'o> ValueGraphBuilder<'o> {
    fn new(options: &'o ExtractOptions) -> Self {
        ValueGraphBuilder {
            options,
            policy: ExpansionPolicy::new(options),
            catalog: TypeCatalog::new(options.docs.as_ref()),
            index: HashMap::new(),
            nodes: Vec::new(),
            depth_warned: false,
            nodes_warned: false,
        }
    }

    /// Resolves `value` to its node, creating and expanding it on first
    /// sight.
    ///
    /// `readable` is whether the edge reaching the value allows reading its
    /// contents. Returns the node and whether a pointer was crossed, or
    /// `None` when the value is a nil pointer or the node ceiling is hit.
    fn resolve(&mut self, value: &dyn Inspect, readable: bool, depth: usize) -> Option<(ValueNodeId, bool)> {
        let (target, view, through_pointer) = deref(value)?;

        let identity = Identity::of(target);
        if let Some(&id) = identity.and_then(|identity| self.index.get(&identity)) {
            self.nodes[id.index()].referred += 1;
            return Some((id, through_pointer));
        }

        if let Some(max) = self.options.max_nodes {
            if self.nodes.len() >= max {
                if !self.nodes_warned {
                    warn!(max_nodes = max, "node ceiling reached, dropping further values");
                    self.nodes_warned = true;
                }
                return None;
            }
        }

        let id = ValueNodeId(self.nodes.len() as u32);
        if let Some(identity) = identity {
            self.index.insert(identity, id);
        }
        let ty = self.catalog.resolve(target.type_ref());
        self.nodes.push(ValueNode {
            id,
            ty,
            referred: 1,
            elements: IndexMap::new(),
            flags: IndexMap::new(),
        });
        trace!(id = %id, ty = %ty, depth, "new value");

        if let Some(max) = self.options.max_depth {
            if depth >= max {
                if !self.depth_warned {
                    warn!(max_depth = max, "depth ceiling reached, leaving values opaque");
                    self.depth_warned = true;
                }
                return Some((id, through_pointer));
            }
        }

        if !self.expandable(ty, readable, depth == 0) {
            return Some((id, through_pointer));
        }

        match view {
            View::Interface(Some(held)) => {
                self.link(id, String::new(), held, readable, EdgeFlags::empty(), depth);
            }
            View::Struct(fields) => {
                for field in fields {
                    let mut flags = EdgeFlags::empty();
                    flags.set(EdgeFlags::ANONYMOUS, field.anonymous);
                    flags.set(EdgeFlags::UNEXPORTED, !field.exported);
                    let readable = field.exported || self.options.include_unexported;
                    self.link(id, field.name.to_string(), field.value, readable, flags, depth);
                }
            }
            View::Map(mut entries) => {
                entries.sort_by(|a, b| a.key.cmp(&b.key));
                self.nodes[id.index()].referred += entries.len() as u32;
                for (i, entry) in entries.into_iter().enumerate() {
                    self.link(id, i.to_string(), entry.value, true, EdgeFlags::empty(), depth);
                }
            }
            View::Seq(items) => {
                self.nodes[id.index()].referred += items.len() as u32;
                for (i, item) in items.into_iter().enumerate() {
                    self.link(id, i.to_string(), item, true, EdgeFlags::empty(), depth);
                }
            }
            View::Interface(None) | View::Opaque | View::Pointer(_) => {}
        }
        Some((id, through_pointer))
    }

    /// Resolves `child` and records the edge `parent[key] -> child`. Nil
    /// children leave no edge.
    fn link(
        &mut self,
        parent: ValueNodeId,
        key: String,
        child: &dyn Inspect,
        readable: bool,
        mut flags: EdgeFlags,
        depth: usize,
    ) {
        let Some((child, through_pointer)) = self.resolve(child, readable, depth + 1) else {
            return;
        };
        flags.set(EdgeFlags::POINTER, through_pointer);

        let node = &mut self.nodes[parent.index()];
        if !flags.is_empty() {
            node.flags.insert(key.clone(), flags);
        }
        node.elements.insert(key, child);
    }

    fn expandable(&self, ty: TypeNodeId, readable: bool, root: bool) -> bool {
        let node = self.catalog.node(ty);
        let covered = || self.policy.covers(self.catalog.key(ty), &node.package);
        match node.kind {
            Kind::Interface => true,
            _ if root => true,
            Kind::Struct => covered(),
            Kind::Map | Kind::Slice | Kind::Array => readable || covered(),
            _ => false,
        }
    }

    fn finish(self) -> Tree {
        let types = self.catalog.finish();
        debug!(values = self.nodes.len(), types = types.len(), "extraction finished");
        Tree {
            values: self.nodes,
            types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_prefixes_match_whole_segments() {
        let options = ExtractOptions::new().expand_package("app::model");
        let policy = ExpansionPolicy::new(&options);
        let key = TypeId::of::<u8>();

        assert!(policy.covers(key, "app::model"));
        assert!(policy.covers(key, "app::model::ledger"));
        assert!(!policy.covers(key, "app::models"));
        assert!(!policy.covers(key, "app"));
        assert!(!policy.covers(key, ""));
    }

    #[test]
    fn exact_types_are_covered_anywhere() {
        let options = ExtractOptions::new().expand_type::<String>();
        let policy = ExpansionPolicy::new(&options);
        assert!(policy.covers(TypeId::of::<String>(), "elsewhere"));
        assert!(!policy.covers(TypeId::of::<u8>(), "elsewhere"));
    }

    #[test]
    fn root_package_is_admitted() {
        let mut policy = ExpansionPolicy::default();
        policy.admit_root(TypeDesc::named::<u8>(Kind::Struct, "app::model", "Root"));
        assert!(policy.covers(TypeId::of::<u32>(), "app::model::inner"));
        assert!(policy.covers(TypeId::of::<u8>(), ""));
    }

    #[test]
    fn nil_root_yields_empty_tree() {
        let root: Option<Box<i32>> = None;
        let tree = extract(&root, &ExtractOptions::default());
        assert!(tree.is_empty());
        assert!(tree.types.is_empty());
    }

    #[test]
    fn sequences_bulk_add_their_length() {
        let root = vec![1i32, 2, 3];
        let tree = extract(&root, &ExtractOptions::default());
        assert_eq!(tree.values.len(), 4);
        assert_eq!(tree.values[0].referred, 4);
        let keys: Vec<_> = tree.values[0].elements.keys().map(String::as_str).collect();
        assert_eq!(keys, ["0", "1", "2"]);
        assert_eq!(tree.types.len(), 2);
    }

    #[test]
    fn max_nodes_drops_edges() {
        let root = vec![1i32, 2, 3];
        let options = ExtractOptions::new().with_max_nodes(Some(2));
        let tree = extract(&root, &options);
        assert_eq!(tree.values.len(), 2);
        assert_eq!(tree.values[0].elements.len(), 1);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn max_depth_leaves_values_opaque() {
        let root = vec![vec![1u8, 2], vec![3u8]];
        let options = ExtractOptions::new().with_max_depth(Some(1));
        let tree = extract(&root, &options);
        // root + two inner vectors, whose elements are never visited
        assert_eq!(tree.values.len(), 3);
        assert!(tree.values[1].elements.is_empty());
        assert!(tree.values[2].elements.is_empty());
    }
}

//! Per-call extraction configuration.

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::describe::{Describe, TypeRef};
use crate::docs::{DocLookup, EmbeddedDocs};

/// Default recursion ceiling for [`ExtractOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options for a single [`extract`](crate::extract) call.
///
/// Nothing here is global: every call gets its own options and tables.
#[derive(Clone)]
pub struct ExtractOptions {
    /// Module-path prefixes whose structs are expanded.
    pub expand_packages: Vec<String>,
    /// Exact canonical types whose values are expanded.
    pub expand_types: HashSet<TypeId>,
    /// Read the contents of non-`pub` fields.
    pub include_unexported: bool,
    pub docs: Arc<dyn DocLookup>,
    /// Values deeper than this become opaque leaves.
    pub max_depth: Option<usize>,
    /// Values beyond this many nodes are dropped, together with their edge.
    pub max_nodes: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            expand_packages: Vec::new(),
            expand_types: HashSet::new(),
            include_unexported: false,
            docs: Arc::new(EmbeddedDocs),
            max_depth: Some(DEFAULT_MAX_DEPTH),
            max_nodes: None,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expands every struct declared under `prefix` (e.g. `"my_crate::model"`).
    pub fn expand_package(mut self, prefix: impl Into<String>) -> Self {
        self.expand_packages.push(prefix.into());
        self
    }

    /// Expands values whose canonical type is `T`.
    pub fn expand_type<T: Describe + ?Sized>(mut self) -> Self {
        self.expand_types.insert(TypeRef::of::<T>().canonical().key);
        self
    }

    pub fn include_unexported(mut self, include: bool) -> Self {
        self.include_unexported = include;
        self
    }

    pub fn with_docs(mut self, docs: impl DocLookup + 'static) -> Self {
        self.docs = Arc::new(docs);
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: Option<usize>) -> Self {
        self.max_nodes = max_nodes;
        self
    }
}

impl fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("expand_packages", &self.expand_packages)
            .field("expand_types", &self.expand_types.len())
            .field("include_unexported", &self.include_unexported)
            .field("max_depth", &self.max_depth)
            .field("max_nodes", &self.max_nodes)
            .finish_non_exhaustive()
    }
}

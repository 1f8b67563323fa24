//! Summary statistics over an extracted tree.

use std::collections::BTreeMap;

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::DiGraph;
use serde::Serialize;

use crate::kind::Kind;
use crate::tree::Tree;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub values: usize,
    pub types: usize,
    pub edges: usize,
    pub max_referred: u32,
    /// Whether any value can reach itself.
    pub cyclic: bool,
    /// Strongly connected components with more than one value, plus lone
    /// values that point at themselves.
    pub cycles: usize,
    /// Value count per kind of their type.
    pub kinds: BTreeMap<Kind, usize>,
}

impl Tree {
    /// Computes [`TreeStats`]. Dangling references are ignored; call
    /// [`validate`](Tree::validate) first to rule them out.
    pub fn stats(&self) -> TreeStats {
        let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(self.values.len(), self.edge_count());
        let nodes: Vec<_> = self.values.iter().map(|_| graph.add_node(())).collect();
        for value in &self.values {
            for target in value.elements.values() {
                let (Some(&from), Some(&to)) = (nodes.get(value.id.index()), nodes.get(target.index())) else {
                    continue;
                };
                graph.add_edge(from, to, ());
            }
        }

        // A self-loop only adds a cycle when its node is alone in its component.
        let cycles = tarjan_scc(&graph)
            .iter()
            .filter(|scc| match scc.as_slice() {
                [node] => graph.contains_edge(*node, *node),
                _ => true,
            })
            .count();

        let mut kinds = BTreeMap::new();
        for value in &self.values {
            if let Some(ty) = self.type_of(value) {
                *kinds.entry(ty.kind).or_insert(0) += 1;
            }
        }

        TreeStats {
            values: self.values.len(),
            types: self.types.len(),
            edges: self.edge_count(),
            max_referred: self.values.iter().map(|v| v.referred).max().unwrap_or(0),
            cyclic: is_cyclic_directed(&graph),
            cycles,
            kinds,
        }
    }
}

//! Simple undirected adjacency over a [`RoadNetwork`].
//!
//! Adjacency is a **set** relation: node `a` is adjacent to `b` iff at least
//! one directed edge `a → b` or `b → a` exists.  Parallel edges, reciprocal
//! edges and duplicates all collapse into one unordered pair.  A self-loop
//! `a → a` makes `a` adjacent to itself.

use rustc_hash::FxHashSet;

use jx_core::NodeId;

use crate::network::RoadNetwork;

/// Undirected view built once from a directed multigraph.
#[derive(Clone, Debug)]
pub struct UndirectedView {
    /// Distinct neighbours of each node, in first-seen edge order.
    neighbors: Vec<Vec<NodeId>>,
    pair_count: usize,
}

impl UndirectedView {
    pub fn from_network(net: &RoadNetwork) -> Self {
        let mut pairs: FxHashSet<(NodeId, NodeId)> =
            FxHashSet::with_capacity_and_hasher(net.edge_count(), Default::default());
        let mut neighbors: Vec<Vec<NodeId>> = vec![Vec::new(); net.node_count()];

        for (&a, &b) in net.edge_from.iter().zip(&net.edge_to) {
            let key = if a <= b { (a, b) } else { (b, a) };
            if !pairs.insert(key) {
                continue;
            }
            neighbors[a.index()].push(b);
            if a != b {
                neighbors[b.index()].push(a);
            }
        }

        Self { neighbors, pair_count: pairs.len() }
    }

    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of distinct unordered pairs (self-loops count once).
    pub fn edge_count(&self) -> usize {
        self.pair_count
    }

    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.neighbors[node.index()]
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors[node.index()].len()
    }

    #[inline]
    pub fn is_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors[a.index()].contains(&b)
    }
}

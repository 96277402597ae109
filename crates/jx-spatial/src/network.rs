//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph is a **directed multigraph** stored in Compressed Sparse Row
//! (CSR) format.  Given a `NodeId n`, its outgoing edges occupy:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Parallel edges and self-loops are kept exactly as the data provider
//! produced them; collapsing them is the job of
//! [`UndirectedView`](crate::UndirectedView).
//!
//! # Node order
//!
//! `NodeId`s are assigned in insertion order, which every loader keeps equal
//! to the provider's native node order.  Filtering passes
//! ([`RoadNetwork::retain_nodes`]) preserve relative order, so output that
//! iterates `NodeId`s in sequence is reproducible run to run.

use jx_core::{GeoPoint, NodeId};

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format.
///
/// All fields are `pub` for direct indexed access.  Do not construct
/// directly; use [`RoadNetworkBuilder`].
#[derive(Clone, Debug)]
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node (`lat` = y, `lon` = x).
    pub node_pos: Vec<GeoPoint>,

    /// Provider-assigned identifier of each node (OSM node id).
    pub osm_id: Vec<i64>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (edge i = position in source-sorted order) ─────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres.
    pub edge_length_m: Vec<f64>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// All node ids in provider order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.node_count() as u32).map(NodeId)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Edge indices of the outgoing edges of `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> std::ops::Range<usize> {
        self.node_out_start[node.index()] as usize..self.node_out_start[node.index() + 1] as usize
    }

    /// Heads of the outgoing edges of `node`, one per edge (parallel edges
    /// repeat).
    #[inline]
    pub fn out_targets(&self, node: NodeId) -> &[NodeId] {
        &self.edge_to[self.out_edges(node)]
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_edges(node).len()
    }

    // ── Filtering ─────────────────────────────────────────────────────────

    /// Copy of this network restricted to nodes with `keep[n] == true`.
    ///
    /// Edges survive when both endpoints survive.  Relative node order and
    /// relative edge order are preserved; `NodeId`s are reassigned densely.
    pub fn retain_nodes(&self, keep: &[bool]) -> RoadNetwork {
        debug_assert_eq!(keep.len(), self.node_count());

        let kept = keep.iter().filter(|k| **k).count();
        let mut b = RoadNetworkBuilder::with_capacity(kept, self.edge_count());
        let mut remap = vec![NodeId::INVALID; self.node_count()];

        for n in self.nodes() {
            if keep[n.index()] {
                remap[n.index()] = b.add_node(self.osm_id[n.index()], self.node_pos[n.index()]);
            }
        }
        for e in 0..self.edge_count() {
            let from = remap[self.edge_from[e].index()];
            let to   = remap[self.edge_to[e].index()];
            if from != NodeId::INVALID && to != NodeId::INVALID {
                b.add_directed_edge(from, to, self.edge_length_m[e]);
            }
        }
        b.build()
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// stable-sorts edges by source node and constructs the CSR arrays.
///
/// # Example
///
/// ```
/// use jx_core::GeoPoint;
/// use jx_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(1, GeoPoint::new(35.690, 139.700));
/// let c = b.add_node(2, GeoPoint::new(35.691, 139.701));
/// b.add_road(a, c, 140.0);
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    osm_ids:   Vec<i64>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), osm_ids: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            osm_ids:   Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, osm_id: i64, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.osm_ids.push(osm_id);
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) {
        self.raw_edges.push(RawEdge { from, to, length_m });
    }

    /// Convenience: add edges in **both directions** for a two-way segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) {
        self.add_directed_edge(a, b, length_m);
        self.add_directed_edge(b, a, length_m);
    }

    /// Look up the position of a node added earlier (used by loaders to
    /// compute edge lengths between adjacent way nodes).
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable: parallel edges keep their insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        RoadNetwork {
            node_pos: self.nodes,
            osm_id: self.osm_ids,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Provider-side graph clean-up applied after download.
//!
//! Raw OSM ways put a node at every bend of a road.  A street network is
//! expected to contain junctions and dead ends only, clipped to the query
//! region, so every fetcher runs the same pipeline:
//!
//! 1. [`truncate`] to the buffered query box,
//! 2. keep the [`largest_weak_component`] (unless `retain_all`),
//! 3. [`simplify`] interstitial chains (if enabled),
//! 4. [`truncate`] to the exact query box,
//! 5. keep the largest weak component again (unless `retain_all`).
//!
//! Downloading a buffered box first means roads crossing the boundary are
//! simplified with their outside neighbours in view, so endpoint detection
//! near the edge matches what it would be in a larger extract.

use log::debug;
use rustc_hash::FxHashSet;

use jx_core::{BoundingBox, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};

// ── Options ───────────────────────────────────────────────────────────────────

/// Knobs for the post-download pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchOptions {
    /// Margin in metres fetched around the query box.  Default: 500.
    pub buffer_m: f64,
    /// Collapse interstitial nodes into single edges.  Default: `true`.
    pub simplify: bool,
    /// Keep every weakly connected component rather than the largest.
    /// Default: `false`.
    pub retain_all: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { buffer_m: 500.0, simplify: true, retain_all: false }
    }
}

/// Run the full pipeline described in the module docs.
pub fn postprocess(net: RoadNetwork, bbox: &BoundingBox, opts: &FetchOptions) -> RoadNetwork {
    let mut net = truncate(&net, &bbox.buffered(opts.buffer_m));
    if !opts.retain_all {
        net = largest_weak_component(&net);
    }
    if opts.simplify {
        net = simplify(&net);
    }
    net = truncate(&net, bbox);
    if !opts.retain_all {
        net = largest_weak_component(&net);
    }
    debug!("post-processed network: {} nodes, {} edges", net.node_count(), net.edge_count());
    net
}

// ── Truncation ────────────────────────────────────────────────────────────────

/// Drop every node outside `bbox` (and the edges touching it).
pub fn truncate(net: &RoadNetwork, bbox: &BoundingBox) -> RoadNetwork {
    let keep: Vec<bool> = net.node_pos.iter().map(|p| bbox.contains(*p)).collect();
    net.retain_nodes(&keep)
}

// ── Connectivity ──────────────────────────────────────────────────────────────

/// Keep only the largest weakly connected component.
///
/// Ties go to the component whose first node comes earliest in node order.
pub fn largest_weak_component(net: &RoadNetwork) -> RoadNetwork {
    let n = net.node_count();
    if n == 0 {
        return net.clone();
    }

    let mut parent: Vec<u32> = (0..n as u32).collect();
    for e in 0..net.edge_count() {
        union(&mut parent, net.edge_from[e].0, net.edge_to[e].0);
    }

    let mut size = vec![0u32; n];
    for i in 0..n as u32 {
        size[find(&mut parent, i) as usize] += 1;
    }

    // First node (in order) of the biggest component identifies it.
    let mut best_root = find(&mut parent, 0);
    for i in 1..n as u32 {
        let r = find(&mut parent, i);
        if size[r as usize] > size[best_root as usize] {
            best_root = r;
        }
    }

    let keep: Vec<bool> = (0..n as u32).map(|i| find(&mut parent, i) == best_root).collect();
    net.retain_nodes(&keep)
}

fn find(parent: &mut [u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        parent[x as usize] = parent[parent[x as usize] as usize];
        x = parent[x as usize];
    }
    x
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // Lower root wins so roots stay stable regardless of edge order.
        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[hi as usize] = lo;
    }
}

// ── Simplification ────────────────────────────────────────────────────────────

/// Per-node degree information needed for endpoint detection.
struct Topology {
    /// Distinct successors in out-edge order.
    succ: Vec<Vec<NodeId>>,
    /// Distinct predecessors.
    pred: Vec<FxHashSet<NodeId>>,
    in_degree: Vec<usize>,
}

impl Topology {
    fn of(net: &RoadNetwork) -> Self {
        let n = net.node_count();
        let mut succ: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        let mut pred: Vec<FxHashSet<NodeId>> = vec![FxHashSet::default(); n];
        let mut in_degree = vec![0usize; n];

        for node in net.nodes() {
            for &to in net.out_targets(node) {
                if !succ[node.index()].contains(&to) {
                    succ[node.index()].push(to);
                }
                pred[to.index()].insert(node);
                in_degree[to.index()] += 1;
            }
        }
        Self { succ, pred, in_degree }
    }

    /// A node is an endpoint unless it sits in the middle of a simple chain.
    fn is_endpoint(&self, net: &RoadNetwork, node: NodeId) -> bool {
        let i = node.index();
        let out_degree = net.out_degree(node);

        if self.succ[i].contains(&node) {
            return true; // self-loop
        }
        if out_degree == 0 || self.in_degree[i] == 0 {
            return true; // source or sink
        }

        let mut neighbors: FxHashSet<NodeId> = self.pred[i].clone();
        neighbors.extend(self.succ[i].iter().copied());
        let degree = out_degree + self.in_degree[i];

        // One-way chains have degree 2, two-way chains degree 4.
        !(neighbors.len() == 2 && (degree == 2 || degree == 4))
    }
}

/// Collapse chains of interstitial nodes into single edges between
/// endpoints.
///
/// Each merged edge's length is the sum of the segments it replaces.  Rings
/// consisting solely of interstitial nodes have no endpoint to start from and
/// are left untouched.
pub fn simplify(net: &RoadNetwork) -> RoadNetwork {
    let topo = Topology::of(net);
    let endpoint: Vec<bool> = net.nodes().map(|n| topo.is_endpoint(net, n)).collect();

    let mut removed = vec![false; net.node_count()];
    let mut merged: Vec<(NodeId, NodeId, f64)> = Vec::new();

    for start in net.nodes().filter(|n| endpoint[n.index()]) {
        for &next in &topo.succ[start.index()] {
            if endpoint[next.index()] {
                continue;
            }
            let path = build_path(&topo, &endpoint, start, next);
            if path.len() < 2 {
                continue;
            }
            for interior in &path[1..path.len() - 1] {
                removed[interior.index()] = true;
            }
            let length_m = path.windows(2).map(|w| segment_length(net, w[0], w[1])).sum::<f64>();
            merged.push((path[0], path[path.len() - 1], length_m));
        }
    }

    let kept = removed.iter().filter(|r| !**r).count();
    let mut b = RoadNetworkBuilder::with_capacity(kept, net.edge_count());
    let mut remap = vec![NodeId::INVALID; net.node_count()];
    for n in net.nodes().filter(|n| !removed[n.index()]) {
        remap[n.index()] = b.add_node(net.osm_id[n.index()], net.node_pos[n.index()]);
    }
    for e in 0..net.edge_count() {
        let (from, to) = (net.edge_from[e], net.edge_to[e]);
        if !removed[from.index()] && !removed[to.index()] {
            b.add_directed_edge(remap[from.index()], remap[to.index()], net.edge_length_m[e]);
        }
    }
    for (from, to, length_m) in merged {
        if removed[from.index()] || removed[to.index()] {
            continue;
        }
        b.add_directed_edge(remap[from.index()], remap[to.index()], length_m);
    }

    debug!(
        "simplified {} nodes into {} ({} merged edges)",
        net.node_count(),
        b.node_count(),
        b.edge_count()
    );
    b.build()
}

/// Walk forward from `start` through `first` until an endpoint is reached.
///
/// Returns the full node sequence including both ends, or an empty path when
/// `first` has nowhere new to go.
fn build_path(topo: &Topology, endpoint: &[bool], start: NodeId, first: NodeId) -> Vec<NodeId> {
    let mut path = vec![start, first];

    let Some(&second) = topo.succ[first.index()].iter().find(|s| !path.contains(*s)) else {
        return Vec::new();
    };
    path.push(second);

    let mut current = second;
    while !endpoint[current.index()] {
        let onward: Vec<NodeId> = topo.succ[current.index()]
            .iter()
            .copied()
            .filter(|s| !path.contains(s))
            .collect();
        match onward.as_slice() {
            [only] => {
                current = *only;
                path.push(current);
            }
            [] => {
                // Closed loop back to the start, or a dead end left by a
                // digitisation error.  Either way the chain stops here.
                if topo.succ[current.index()].contains(&start) {
                    path.push(start);
                }
                return path;
            }
            // Cannot happen for a non-endpoint (it has exactly two neighbours,
            // one of which is already on the path); stop rather than guess.
            _ => return path,
        }
    }
    path
}

/// Length of the first `from → to` edge.
fn segment_length(net: &RoadNetwork, from: NodeId, to: NodeId) -> f64 {
    net.out_edges(from)
        .find(|&e| net.edge_to[e] == to)
        .map(|e| net.edge_length_m[e])
        .unwrap_or_else(|| net.node_pos[from.index()].distance_m(net.node_pos[to.index()]))
}

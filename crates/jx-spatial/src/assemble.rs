//! Turn raw OSM nodes and filtered ways into a [`RoadNetwork`].
//!
//! Shared by the Overpass and PBF sources.  Only nodes referenced by at
//! least one kept way become graph nodes, and they keep the order in which
//! the source listed them.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use jx_core::{GeoPoint, NodeId};

use crate::filter::Direction;
use crate::network::{RoadNetwork, RoadNetworkBuilder};

/// Source-agnostic OSM data after way filtering.
#[derive(Default)]
pub(crate) struct OsmExtract {
    /// `(osm_id, position)` in source order.
    pub nodes: Vec<(i64, GeoPoint)>,
    pub ways:  Vec<OsmWay>,
}

pub(crate) struct OsmWay {
    pub refs:      Vec<i64>,
    pub direction: Direction,
}

pub(crate) fn assemble(extract: OsmExtract) -> RoadNetwork {
    let referenced: FxHashSet<i64> = extract
        .ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .collect();

    let mut builder = RoadNetworkBuilder::with_capacity(referenced.len(), referenced.len() * 2);
    let mut osm_to_jx: FxHashMap<i64, NodeId> =
        FxHashMap::with_capacity_and_hasher(referenced.len(), Default::default());

    for (osm_id, pos) in &extract.nodes {
        if referenced.contains(osm_id) && !osm_to_jx.contains_key(osm_id) {
            osm_to_jx.insert(*osm_id, builder.add_node(*osm_id, *pos));
        }
    }

    let mut dangling = 0usize;
    for way in &extract.ways {
        for window in way.refs.windows(2) {
            let (Some(&a), Some(&b)) = (osm_to_jx.get(&window[0]), osm_to_jx.get(&window[1])) else {
                dangling += 1;
                continue;
            };
            let len_m = builder.node_pos(a).distance_m(builder.node_pos(b));
            match way.direction {
                Direction::Both    => builder.add_road(a, b, len_m),
                Direction::Forward => builder.add_directed_edge(a, b, len_m),
                Direction::Reverse => builder.add_directed_edge(b, a, len_m),
            }
        }
    }
    if dangling > 0 {
        debug!("skipped {dangling} way segments referencing nodes outside the extract");
    }

    builder.build()
}

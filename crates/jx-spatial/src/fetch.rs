//! The graph retrieval seam.
//!
//! # Pluggability
//!
//! Callers obtain a street network only through the [`GraphFetcher`] trait,
//! so the live Overpass client, an offline PBF extract, a cached response
//! file or a fixed in-memory graph can be swapped without touching the
//! serialisation code.

use jx_core::{BoundingBox, NetworkType};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

/// Retrieve a street network clipped to a bounding box.
pub trait GraphFetcher {
    /// Produce the directed road graph for `bbox`, restricted to the road
    /// classes selected by `network_type`.
    ///
    /// Node order in the result is the provider's native order.  Parallel
    /// edges and self-loops may be present.
    ///
    /// # Errors
    ///
    /// Implementations fail when the provider is unreachable, rejects the
    /// query, or yields no data for the region.
    fn fetch(&self, bbox: &BoundingBox, network_type: NetworkType) -> SpatialResult<RoadNetwork>;
}

impl<F: GraphFetcher + ?Sized> GraphFetcher for Box<F> {
    fn fetch(&self, bbox: &BoundingBox, network_type: NetworkType) -> SpatialResult<RoadNetwork> {
        (**self).fetch(bbox, network_type)
    }
}

// ── InMemoryFetcher ───────────────────────────────────────────────────────────

/// Returns a fixed network regardless of the query.
///
/// Used in tests and for graphs built by hand with
/// [`RoadNetworkBuilder`](crate::RoadNetworkBuilder).
pub struct InMemoryFetcher {
    network: RoadNetwork,
}

impl InMemoryFetcher {
    pub fn new(network: RoadNetwork) -> Self {
        Self { network }
    }
}

impl GraphFetcher for InMemoryFetcher {
    fn fetch(&self, bbox: &BoundingBox, network_type: NetworkType) -> SpatialResult<RoadNetwork> {
        if self.network.is_empty() {
            return Err(SpatialError::EmptyRegion { bbox: *bbox, network_type });
        }
        Ok(self.network.clone())
    }
}

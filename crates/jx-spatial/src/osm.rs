//! OSM PBF loader, enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use jx_core::{BoundingBox, NetworkType};
//! use jx_spatial::{FetchOptions, GraphFetcher, osm::PbfFetcher};
//!
//! let fetcher = PbfFetcher::new("kanto-latest.osm.pbf", FetchOptions::default());
//! let network = fetcher.fetch(&bbox, NetworkType::Drive)?;
//! ```
//!
//! # What is loaded
//!
//! Ways passing the network-type filter, and the nodes inside the buffered
//! query box that those ways reference.  Everything else (buildings, POIs,
//! relations) is ignored.  The result then goes through the same
//! post-processing as an Overpass download.
//!
//! # Memory note
//!
//! Nodes inside the buffered box are buffered in file order during the single
//! pass (ways reference node IDs that appear earlier in the file).  Nodes
//! outside the box are never stored, so memory scales with the query region,
//! not the extract.

use std::path::{Path, PathBuf};

use log::info;
use osmpbf::{Element, ElementReader};
use rustc_hash::FxHashSet;

use jx_core::{BoundingBox, GeoPoint, NetworkType};

use crate::assemble::{OsmExtract, OsmWay, assemble};
use crate::fetch::GraphFetcher;
use crate::filter;
use crate::network::RoadNetwork;
use crate::postprocess::{FetchOptions, postprocess};
use crate::{SpatialError, SpatialResult};

/// Reads a street network from a local `.osm.pbf` extract.
pub struct PbfFetcher {
    path:    PathBuf,
    options: FetchOptions,
}

impl PbfFetcher {
    pub fn new(path: impl Into<PathBuf>, options: FetchOptions) -> Self {
        Self { path: path.into(), options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphFetcher for PbfFetcher {
    /// # Errors
    ///
    /// Returns [`SpatialError::Core`] for a malformed box (there is no
    /// server to reject it), [`SpatialError::Osm`] when the file cannot be
    /// opened or decoded.
    fn fetch(&self, bbox: &BoundingBox, network_type: NetworkType) -> SpatialResult<RoadNetwork> {
        bbox.validate()?;
        info!("reading {network_type} network for {bbox} from {}", self.path.display());

        let extract = read_extract(&self.path, &bbox.buffered(self.options.buffer_m), network_type)?;
        let empty = || SpatialError::EmptyRegion { bbox: *bbox, network_type };
        if extract.ways.is_empty() {
            return Err(empty());
        }

        let net = postprocess(assemble(extract), bbox, &self.options);
        if net.is_empty() {
            return Err(empty());
        }
        Ok(net)
    }
}

/// One sequential pass: nodes inside `region`, ways passing the filter.
fn read_extract(path: &Path, region: &BoundingBox, network_type: NetworkType) -> SpatialResult<OsmExtract> {
    let reader = ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;
    let mut extract = OsmExtract::default();
    // PBF files list nodes before ways, so membership is known by the time
    // a way is read.
    let mut inside: FxHashSet<i64> = FxHashSet::default();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                let pos = GeoPoint::new(n.lat(), n.lon());
                if region.contains(pos) {
                    inside.insert(n.id());
                    extract.nodes.push((n.id(), pos));
                }
            }
            Element::DenseNode(n) => {
                let pos = GeoPoint::new(n.lat(), n.lon());
                if region.contains(pos) {
                    inside.insert(n.id());
                    extract.nodes.push((n.id(), pos));
                }
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                if filter::accepts(network_type, &tags) {
                    let refs: Vec<i64> = w.refs().collect();
                    if refs.len() >= 2 && refs.iter().any(|r| inside.contains(r)) {
                        let direction = filter::direction(network_type, &tags);
                        extract.ways.push(OsmWay { refs, direction });
                    }
                }
            }
            Element::Relation(_) => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    // Ways crossing the region boundary are kept whole; `assemble` drops
    // the segments whose nodes were not stored.
    Ok(extract)
}

//! Overpass API retrieval.
//!
//! # Query
//!
//! One request per fetch: every way matching the network-type filter inside
//! the buffered box, recursed down to its nodes.
//!
//! ```text
//! [out:json][timeout:180];(way["highway"]…(S,W,N,E);>;);out;
//! ```
//!
//! `out;` lists nodes before ways, each sorted by id, and that node order is
//! kept all the way to the output file.
//!
//! # Offline use
//!
//! Response parsing does not need the `http` feature: a saved response body
//! can be replayed through [`CachedResponseFetcher`].

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use jx_core::{BoundingBox, GeoPoint, NetworkType};

use crate::assemble::{OsmExtract, OsmWay, assemble};
use crate::fetch::GraphFetcher;
use crate::filter;
use crate::network::RoadNetwork;
use crate::postprocess::{FetchOptions, postprocess};
use crate::{SpatialError, SpatialResult};

/// Public endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Server-side query timeout in seconds; the HTTP client waits slightly
/// longer so the server gets to report its own timeout first.
pub const DEFAULT_TIMEOUT_SECS: u64 = 180;

// ── Response model ────────────────────────────────────────────────────────────

/// Top level of an `[out:json]` response body.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
    /// Set by the server when the query hit a runtime error (timeout, memory
    /// limit); `elements` is then incomplete.
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverpassElement {
    Node {
        id:  i64,
        lat: f64,
        lon: f64,
    },
    Way {
        id:    i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags:  HashMap<String, String>,
    },
    #[serde(other)]
    Other,
}

impl OverpassResponse {
    pub fn from_reader<R: Read>(reader: R) -> SpatialResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_slice(body: &[u8]) -> SpatialResult<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Fail on a server-reported runtime error.
    fn check_remark(&self) -> SpatialResult<()> {
        match &self.remark {
            Some(remark) if remark.contains("runtime error") => {
                Err(SpatialError::Fetch(format!("Overpass: {remark}")))
            }
            _ => Ok(()),
        }
    }

    /// Filter ways for `network_type` and split elements into an extract.
    fn into_extract(self, network_type: NetworkType) -> OsmExtract {
        let mut extract = OsmExtract::default();
        for element in self.elements {
            match element {
                OverpassElement::Node { id, lat, lon } => {
                    extract.nodes.push((id, GeoPoint::new(lat, lon)));
                }
                OverpassElement::Way { id, nodes, tags } => {
                    let tags: Vec<(&str, &str)> =
                        tags.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
                    if nodes.len() < 2 || !filter::accepts(network_type, &tags) {
                        debug!("dropping way {id}");
                        continue;
                    }
                    let direction = filter::direction(network_type, &tags);
                    extract.ways.push(OsmWay { refs: nodes, direction });
                }
                OverpassElement::Other => {}
            }
        }
        extract
    }

    /// Build and post-process the network contained in this response.
    pub fn into_network(
        self,
        bbox: &BoundingBox,
        network_type: NetworkType,
        opts: &FetchOptions,
    ) -> SpatialResult<RoadNetwork> {
        self.check_remark()?;
        let extract = self.into_extract(network_type);
        debug!("response holds {} nodes, {} kept ways", extract.nodes.len(), extract.ways.len());

        let empty = || SpatialError::EmptyRegion { bbox: *bbox, network_type };
        if extract.ways.is_empty() {
            return Err(empty());
        }
        let net = postprocess(assemble(extract), bbox, opts);
        if net.is_empty() {
            return Err(empty());
        }
        Ok(net)
    }
}

/// Overpass QL for all `network_type` ways inside `bbox`, plus their nodes.
pub fn build_query(bbox: &BoundingBox, network_type: NetworkType, timeout_secs: u64) -> String {
    format!(
        "[out:json][timeout:{timeout_secs}];(way{selector}({s},{w},{n},{e});>;);out;",
        selector = filter::overpass_selector(network_type),
        s = bbox.south,
        w = bbox.west,
        n = bbox.north,
        e = bbox.east,
    )
}

// ── CachedResponseFetcher ─────────────────────────────────────────────────────

/// Replays a saved Overpass response body from disk.
///
/// The file is expected to cover at least the buffered query box; the usual
/// post-processing applies.
pub struct CachedResponseFetcher {
    path:    PathBuf,
    options: FetchOptions,
}

impl CachedResponseFetcher {
    pub fn new(path: impl Into<PathBuf>, options: FetchOptions) -> Self {
        Self { path: path.into(), options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphFetcher for CachedResponseFetcher {
    fn fetch(&self, bbox: &BoundingBox, network_type: NetworkType) -> SpatialResult<RoadNetwork> {
        info!("loading cached Overpass response {}", self.path.display());
        let file = std::io::BufReader::new(std::fs::File::open(&self.path)?);
        OverpassResponse::from_reader(file)?.into_network(bbox, network_type, &self.options)
    }
}

// ── OverpassFetcher ───────────────────────────────────────────────────────────

/// Live Overpass API client (blocking).
#[cfg(feature = "http")]
pub struct OverpassFetcher {
    client:       reqwest::blocking::Client,
    endpoint:     String,
    timeout_secs: u64,
    options:      FetchOptions,
}

#[cfg(feature = "http")]
impl OverpassFetcher {
    /// Client for `endpoint` with a server-side timeout of `timeout_secs`.
    pub fn new(endpoint: &str, timeout_secs: u64, options: FetchOptions) -> SpatialResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("junction_export/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(timeout_secs + 30))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
            timeout_secs,
            options,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(feature = "http")]
impl GraphFetcher for OverpassFetcher {
    fn fetch(&self, bbox: &BoundingBox, network_type: NetworkType) -> SpatialResult<RoadNetwork> {
        let query_box = bbox.buffered(self.options.buffer_m);
        let query = build_query(&query_box, network_type, self.timeout_secs);
        info!("requesting {network_type} network for {bbox} from {}", self.endpoint);
        debug!("query: {query}");

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SpatialError::Fetch(format!(
                "{} returned {status}: {}",
                self.endpoint,
                body.trim()
            )));
        }

        let body = response.bytes()?;
        info!("received {} bytes", body.len());
        OverpassResponse::from_slice(&body)?.into_network(bbox, network_type, &self.options)
    }
}

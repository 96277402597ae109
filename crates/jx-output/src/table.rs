//! Junction file reader.
//!
//! # Parsing rules
//!
//! Records are header-less and may have any number of fields.  Each field
//! is parsed as a number; fields that do not parse are skipped.  A record
//! left with fewer than two numbers is ignored.  The first two numbers are
//! the junction's `lat,lon`; the rest pair up as neighbour coordinates (an
//! unpaired trailing value is dropped).
//!
//! # Lookup
//!
//! Junctions are addressable by exact coordinates ([`JunctionTable::get`]),
//! by proximity ([`JunctionTable::nearest`], R-tree backed) and by index.
//! Neighbour coordinates are resolved to junction indices at load time;
//! neighbours that match no junction line are kept in `neighbors` but absent
//! from `adjacency`.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::debug;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use jx_core::{GeoPoint, LocalPoint};

use crate::OutputResult;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the junction's index.
#[derive(Clone)]
struct JunctionEntry {
    point: [f64; 2], // [lat, lon]
    index: usize,
}

impl RTreeObject for JunctionEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for JunctionEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-junction queries within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Junction ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Junction {
    pub pos: GeoPoint,
    /// Neighbour coordinates exactly as listed on the line.
    pub neighbors: Vec<GeoPoint>,
    /// Indices of neighbours that are junctions of this table.
    pub adjacency: Vec<usize>,
    /// Position on the local plane, once [`JunctionTable::project_local`]
    /// has run.
    pub local: Option<LocalPoint>,
    pub local_neighbors: Vec<LocalPoint>,
}

// ── JunctionTable ─────────────────────────────────────────────────────────────

pub struct JunctionTable {
    junctions: Vec<Junction>,
    index:     FxHashMap<(u64, u64), usize>,
    spatial:   RTree<JunctionEntry>,
}

impl JunctionTable {
    /// Load a junction file from disk.
    pub fn from_path(path: &Path) -> OutputResult<Self> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        debug!("loaded {} junctions from {}", table.len(), path.display());
        Ok(table)
    }

    /// Like [`from_path`](Self::from_path) but accepts any `Read` source.
    pub fn from_reader<R: Read>(reader: R) -> OutputResult<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut junctions = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let values: Vec<f64> = record.iter().filter_map(|f| f.parse().ok()).collect();
            if values.len() < 2 {
                continue;
            }
            let neighbors = values[2..]
                .chunks_exact(2)
                .map(|c| GeoPoint::new(c[0], c[1]))
                .collect();
            junctions.push(Junction {
                pos: GeoPoint::new(values[0], values[1]),
                neighbors,
                adjacency: Vec::new(),
                local: None,
                local_neighbors: Vec::new(),
            });
        }

        Ok(Self::from_junctions(junctions))
    }

    fn from_junctions(mut junctions: Vec<Junction>) -> Self {
        // Later lines win on duplicate coordinates.
        let index: FxHashMap<(u64, u64), usize> = junctions
            .iter()
            .enumerate()
            .map(|(i, j)| (key(j.pos), i))
            .collect();

        for j in &mut junctions {
            j.adjacency = j
                .neighbors
                .iter()
                .filter_map(|n| index.get(&key(*n)).copied())
                .collect();
        }

        let entries: Vec<JunctionEntry> = junctions
            .iter()
            .enumerate()
            .map(|(i, j)| JunctionEntry { point: [j.pos.lat, j.pos.lon], index: i })
            .collect();
        let spatial = RTree::bulk_load(entries);

        Self { junctions, index, spatial }
    }

    pub fn len(&self) -> usize {
        self.junctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.junctions.is_empty()
    }

    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    #[inline]
    pub fn junction(&self, index: usize) -> &Junction {
        &self.junctions[index]
    }

    /// Index of the junction at exactly `(lat, lon)`.
    pub fn index_of(&self, lat: f64, lon: f64) -> Option<usize> {
        self.index.get(&key(GeoPoint::new(lat, lon))).copied()
    }

    /// The junction at exactly `(lat, lon)`, if any.
    pub fn get(&self, lat: f64, lon: f64) -> Option<&Junction> {
        self.index_of(lat, lon).map(|i| &self.junctions[i])
    }

    /// Index of the junction closest to `pos`.  `None` only when empty.
    pub fn nearest(&self, pos: GeoPoint) -> Option<usize> {
        self.spatial.nearest_neighbor(&[pos.lat, pos.lon]).map(|e| e.index)
    }

    /// Fill every junction's local-plane coordinates around `reference`.
    pub fn project_local(&mut self, reference: GeoPoint) {
        for j in &mut self.junctions {
            j.local = Some(j.pos.to_local(reference));
            j.local_neighbors = j.neighbors.iter().map(|n| n.to_local(reference)).collect();
        }
    }
}

/// Exact-match key; `+ 0.0` folds `-0.0` into `0.0`.
fn key(p: GeoPoint) -> (u64, u64) {
    ((p.lat + 0.0).to_bits(), (p.lon + 0.0).to_bits())
}

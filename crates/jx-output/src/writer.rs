//! Junction file writer.
//!
//! One line per network node, in `NodeId` order:
//!
//! ```text
//! LAT,LON(,NLAT,NLON)*
//! ```
//!
//! Neighbours come from the [`UndirectedView`] of the network, so every
//! adjacent node appears exactly once however many directed edges joined
//! the two.  Neighbour groups are sorted as `"lat,lon"` strings.  No header,
//! no quoting, `\n` line endings.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use log::{debug, info};

use jx_core::{GeoPoint, NodeId};
use jx_spatial::{RoadNetwork, UndirectedView};

use crate::OutputResult;
use crate::format::{format_coord, format_point};

// ── JunctionLine ──────────────────────────────────────────────────────────────

/// The formatted content of one output line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JunctionLine {
    pub lat: String,
    pub lon: String,
    /// `(lat, lon)` text pairs, sorted by their joined `"lat,lon"` form.
    pub neighbors: Vec<(String, String)>,
}

impl JunctionLine {
    /// Format `node` and its undirected neighbours.
    pub fn build(net: &RoadNetwork, view: &UndirectedView, node: NodeId) -> Self {
        let pos = net.node_pos[node.index()];

        let mut around: Vec<GeoPoint> =
            view.neighbors(node).iter().map(|n| net.node_pos[n.index()]).collect();
        around.sort_by_cached_key(|p| format_point(*p));

        let neighbors = around
            .into_iter()
            .map(|p| (format_coord(p.lat), format_coord(p.lon)))
            .collect();

        Self {
            lat: format_coord(pos.lat),
            lon: format_coord(pos.lon),
            neighbors,
        }
    }

    /// Fields in output order: own coordinates, then each neighbour's.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        [self.lat.as_str(), self.lon.as_str()]
            .into_iter()
            .chain(self.neighbors.iter().flat_map(|(a, b)| [a.as_str(), b.as_str()]))
    }
}

impl std::fmt::Display for JunctionLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)?;
        for (lat, lon) in &self.neighbors {
            write!(f, ",{lat},{lon}")?;
        }
        Ok(())
    }
}

// ── WriteSummary ──────────────────────────────────────────────────────────────

/// Counts reported after a successful write.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Lines written (one per node).
    pub lines: usize,
    /// Nodes written without any neighbour.
    pub isolated: usize,
    /// Distinct undirected adjacencies.
    pub adjacencies: usize,
}

// ── JunctionWriter ────────────────────────────────────────────────────────────

/// Serialises a road network into the junction text format.
///
/// The underlying sink is buffered; [`finish`](Self::finish) flushes it and
/// reports errors.  If the writer is dropped early (an error part-way
/// through), buffered lines are still flushed on drop, leaving a truncated
/// file.
pub struct JunctionWriter<W: Write> {
    out:      Writer<W>,
    finished: bool,
}

impl JunctionWriter<File> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> OutputResult<Self> {
        let out = builder().from_path(path)?;
        debug!("opened {} for writing", path.display());
        Ok(Self { out, finished: false })
    }
}

impl<W: Write> JunctionWriter<W> {
    /// Wrap any byte sink (e.g. a `Vec<u8>` in tests).
    pub fn from_writer(sink: W) -> Self {
        Self { out: builder().from_writer(sink), finished: false }
    }

    /// Write one line per node of `net`, in node order.
    pub fn write_network(&mut self, net: &RoadNetwork) -> OutputResult<WriteSummary> {
        let view = UndirectedView::from_network(net);
        let mut summary = WriteSummary { adjacencies: view.edge_count(), ..Default::default() };

        for node in net.nodes() {
            let line = JunctionLine::build(net, &view, node);
            if line.neighbors.is_empty() {
                summary.isolated += 1;
            }
            self.out.write_record(line.fields())?;
            summary.lines += 1;
        }
        Ok(summary)
    }

    /// Flush buffered output.
    ///
    /// Idempotent.
    pub fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }

    /// Flush and hand back the sink.
    pub fn into_inner(mut self) -> OutputResult<W> {
        self.finish()?;
        self.out.into_inner().map_err(|e| e.into_error().into())
    }
}

/// Write `net` to `path`, replacing any existing file.
pub fn write_junctions(net: &RoadNetwork, path: &Path) -> OutputResult<WriteSummary> {
    let mut w = JunctionWriter::create(path)?;
    let summary = w.write_network(net)?;
    w.finish()?;
    info!(
        "wrote {} junctions ({} adjacencies, {} isolated) to {}",
        summary.lines,
        summary.adjacencies,
        summary.isolated,
        path.display()
    );
    Ok(summary)
}

fn builder() -> WriterBuilder {
    let mut b = WriterBuilder::new();
    b.has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'));
    b
}

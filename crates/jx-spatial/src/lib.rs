//! `jx-spatial`: road network retrieval and undirected adjacency.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`network`]     | `RoadNetwork` (directed multigraph, CSR), `RoadNetworkBuilder` |
//! | [`undirected`]  | `UndirectedView`, set-based undirected adjacency           |
//! | [`fetch`]       | `GraphFetcher` trait, `InMemoryFetcher`                    |
//! | [`overpass`]    | Overpass query/response, `OverpassFetcher` (feature `http`), `CachedResponseFetcher` |
//! | [`osm`]         | `PbfFetcher` (feature = `"osm"` only)                      |
//! | [`filter`]      | Per-network-type way filters and one-way rules            |
//! | [`postprocess`] | Truncation, simplification, largest component             |
//! | [`error`]       | `SpatialError`, `SpatialResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `http`  | Live Overpass retrieval via blocking `reqwest` (default).    |
//! | `osm`   | Enables OSM PBF loading via the `osmpbf` crate.             |
//! | `serde` | Derives `Serialize`/`Deserialize` on core types.             |

mod assemble;

pub mod error;
pub mod fetch;
pub mod filter;
pub mod network;
pub mod overpass;
pub mod postprocess;
pub mod undirected;

#[cfg(feature = "osm")]
pub mod osm;


pub use error::{SpatialError, SpatialResult};
pub use fetch::{GraphFetcher, InMemoryFetcher};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use overpass::CachedResponseFetcher;
pub use postprocess::FetchOptions;
pub use undirected::UndirectedView;

#[cfg(feature = "http")]
pub use overpass::OverpassFetcher;

#[cfg(feature = "osm")]
pub use osm::PbfFetcher;

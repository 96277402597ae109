//! `jx-core`: foundational types for the `junction_export` workspace.
//!
//! This crate is a dependency of every other `jx-*` crate.  It intentionally
//! has no `jx-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module           | Contents                                             |
//! |------------------|------------------------------------------------------|
//! | [`ids`]          | `NodeId`                                             |
//! | [`geo`]          | `GeoPoint`, `LocalPoint`, haversine, local projection |
//! | [`region`]       | `BoundingBox`                                        |
//! | [`network_type`] | `NetworkType` (`drive`, `walk`, …)                   |
//! | [`rng`]          | `WalkRng` (seeded, per-walker)                       |
//! | [`error`]        | `CoreError`, `CoreResult`                            |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod network_type;
pub mod region;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, LocalPoint};
pub use ids::NodeId;
pub use network_type::NetworkType;
pub use region::BoundingBox;
pub use rng::WalkRng;

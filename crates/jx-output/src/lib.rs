//! `jx-output`: junction file writer and reader.
//!
//! # Format
//!
//! Plain text, one line per network node, no header:
//!
//! ```text
//! 35.69,139.7,35.691235,139.701235
//! 35.691235,139.701235,35.69,139.7
//! ```
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | [`format`] | Six-decimal coordinate rendering                      |
//! | [`writer`] | `JunctionWriter`, `write_junctions`                   |
//! | [`table`]  | `JunctionTable` reader, lookup, local projection      |
//! | [`walk`]   | `LeastVisitedWalk` over a loaded table                |
//!
//! # Usage
//!
//! ```rust,ignore
//! use jx_output::{JunctionTable, write_junctions};
//!
//! let summary = write_junctions(&network, Path::new("junctions.csv"))?;
//! let table = JunctionTable::from_path(Path::new("junctions.csv"))?;
//! ```

pub mod error;
pub mod format;
pub mod table;
pub mod walk;
pub mod writer;

#[cfg(test)]
mod tests;

pub use error::{OutputError, OutputResult};
pub use table::{Junction, JunctionTable};
pub use walk::{LeastVisitedWalk, Leg, VisitCounter};
pub use writer::{JunctionLine, JunctionWriter, WriteSummary, write_junctions};

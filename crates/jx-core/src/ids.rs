//! Node identifiers.

use std::fmt;

/// Dense index of a road-network node, assigned in provider order.
///
/// Distinct from the provider's own node id, which is kept alongside the
/// node in `RoadNetwork::osm_id`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// Marks remap slots of dropped nodes.
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// `None` if `index` does not fit in a `u32`.
    pub fn from_index(index: usize) -> Option<NodeId> {
        u32::try_from(index).ok().map(NodeId)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

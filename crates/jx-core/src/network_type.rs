//! Street-network filter selector shared by every fetcher.
//!
//! The tag predicates each variant stands for live in `jx-spatial`'s
//! `filter` module; this crate only names them.

use std::str::FromStr;

use crate::CoreError;

/// Which road classes a fetched network should contain.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NetworkType {
    /// Public roads usable by motor vehicles, without service roads.
    #[default]
    Drive,
    /// `Drive` plus public service roads.
    DriveService,
    /// Everything pedestrians may use; one-way tags are ignored.
    Walk,
    /// Everything cyclists may use.
    Bike,
    /// All non-private ways.
    All,
}

impl NetworkType {
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkType::Drive        => "drive",
            NetworkType::DriveService => "drive_service",
            NetworkType::Walk         => "walk",
            NetworkType::Bike         => "bike",
            NetworkType::All          => "all",
        }
    }

    /// `true` if `oneway` tags should be honoured when building edges.
    #[inline]
    pub fn respects_oneway(self) -> bool {
        !matches!(self, NetworkType::Walk)
    }
}

impl FromStr for NetworkType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drive"         => Ok(NetworkType::Drive),
            "drive_service" => Ok(NetworkType::DriveService),
            "walk"          => Ok(NetworkType::Walk),
            "bike"          => Ok(NetworkType::Bike),
            "all"           => Ok(NetworkType::All),
            other           => Err(CoreError::InvalidNetworkType(other.to_owned())),
        }
    }
}

impl std::fmt::Display for NetworkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

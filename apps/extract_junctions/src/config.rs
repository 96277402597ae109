use std::env::VarError;
use std::path::PathBuf;

use anyhow::{Context, anyhow};

use jx_core::{BoundingBox, NetworkType};
use jx_spatial::FetchOptions;
use jx_spatial::overpass::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

/// Environment variables read by [`ExtractConfig::from_env`].  All optional.
pub const OPTIONAL_VARIABLES: [&str; 4] =
    ["OVERPASS_URL", "OVERPASS_TIMEOUT_SECS", "JX_OVERPASS_CACHE", "JX_OSM_PBF"];

/// Where the street network comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    Overpass { endpoint: String, timeout_secs: u64 },
    /// A saved Overpass JSON response.
    Cached(PathBuf),
    /// A local `.osm.pbf` extract.
    Pbf(PathBuf),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExtractConfig {
    pub bbox:         BoundingBox,
    pub network_type: NetworkType,
    pub output:       PathBuf,
    pub options:      FetchOptions,
    pub source:       Source,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            bbox: BoundingBox::new(
                139.6872307124115,  // west
                35.683074961095016, // south
                139.70037610485127, // east
                35.69236391013,     // north
            ),
            network_type: NetworkType::Drive,
            output:       PathBuf::from("junctions.csv"),
            options:      FetchOptions::default(),
            source:       Source::Overpass {
                endpoint:     DEFAULT_ENDPOINT.to_owned(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}

impl ExtractConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(env)
    }

    /// Defaults with source overrides taken from `lookup`.
    ///
    /// A PBF extract wins over a cached response, which wins over Overpass.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> anyhow::Result<Option<String>>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("JX_OSM_PBF")? {
            config.source = Source::Pbf(path.into());
            return Ok(config);
        }
        if let Some(path) = lookup("JX_OVERPASS_CACHE")? {
            config.source = Source::Cached(path.into());
            return Ok(config);
        }

        let endpoint = lookup("OVERPASS_URL")?.unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
        let timeout_secs = match lookup("OVERPASS_TIMEOUT_SECS")? {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("OVERPASS_TIMEOUT_SECS={v:?} is not a whole number of seconds"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        config.source = Source::Overpass { endpoint, timeout_secs };
        Ok(config)
    }

    pub fn log(&self) {
        log::info!("bbox: {}", self.bbox);
        log::info!("network type: {}", self.network_type);
        log::info!("output: {}", self.output.display());
        match &self.source {
            Source::Overpass { endpoint, timeout_secs } => {
                log::info!("source: Overpass {endpoint} (timeout {timeout_secs}s)")
            }
            Source::Cached(path) => log::info!("source: cached response {}", path.display()),
            Source::Pbf(path) => log::info!("source: PBF extract {}", path.display()),
        }
    }
}

/// An unset or empty variable is `None`.
fn env(name: &str) -> anyhow::Result<Option<String>> {
    match std::env::var(name) {
        Ok(v) if v.is_empty() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(anyhow!("{name} value is not valid unicode")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> anyhow::Result<Option<String>> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| Ok(vars.get(name).cloned())
    }

    #[test]
    fn defaults_match_fixed_region() {
        let c = ExtractConfig::default();
        assert_eq!(c.bbox.north, 35.69236391013);
        assert_eq!(c.bbox.south, 35.683074961095016);
        assert_eq!(c.bbox.east, 139.70037610485127);
        assert_eq!(c.bbox.west, 139.6872307124115);
        assert_eq!(c.network_type, NetworkType::Drive);
        assert_eq!(c.output, PathBuf::from("junctions.csv"));
        assert!(c.bbox.validate().is_ok());
    }

    #[test]
    fn no_variables_gives_defaults() {
        assert_eq!(ExtractConfig::from_lookup(lookup(&[])).unwrap(), ExtractConfig::default());
    }

    #[test]
    fn overpass_overrides() {
        let c = ExtractConfig::from_lookup(lookup(&[
            ("OVERPASS_URL", "http://localhost:12345/api/interpreter"),
            ("OVERPASS_TIMEOUT_SECS", " 60 "),
        ]))
        .unwrap();
        assert_eq!(
            c.source,
            Source::Overpass {
                endpoint:     "http://localhost:12345/api/interpreter".into(),
                timeout_secs: 60,
            }
        );
    }

    #[test]
    fn bad_timeout_rejected() {
        let err = ExtractConfig::from_lookup(lookup(&[("OVERPASS_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("OVERPASS_TIMEOUT_SECS"));
    }

    #[test]
    fn local_sources_take_precedence() {
        let c = ExtractConfig::from_lookup(lookup(&[
            ("OVERPASS_URL", "http://x"),
            ("JX_OVERPASS_CACHE", "resp.json"),
        ]))
        .unwrap();
        assert_eq!(c.source, Source::Cached("resp.json".into()));

        let c = ExtractConfig::from_lookup(lookup(&[
            ("JX_OVERPASS_CACHE", "resp.json"),
            ("JX_OSM_PBF", "tokyo.osm.pbf"),
        ]))
        .unwrap();
        assert_eq!(c.source, Source::Pbf("tokyo.osm.pbf".into()));
    }
}

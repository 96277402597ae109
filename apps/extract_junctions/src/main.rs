//! extract_junctions: dump the street junctions of a fixed region.
//!
//! Fetches the drivable road network inside the configured bounding box,
//! treats it as undirected, and writes one line per junction to
//! `junctions.csv`: the junction's `lat,lon` followed by the sorted
//! coordinates of every adjacent junction.
//!
//! Takes no arguments.  The data source can be redirected through the
//! environment (see [`config::OPTIONAL_VARIABLES`]); `RUST_LOG` controls
//! logging (default `info`).

mod config;

use anyhow::Result;

use jx_output::write_junctions;
use jx_spatial::{CachedResponseFetcher, GraphFetcher, OverpassFetcher};

use config::{ExtractConfig, OPTIONAL_VARIABLES, Source};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ExtractConfig::from_env().inspect_err(|e| {
        log::error!("config: {e}. Check the optional variables ({}).", OPTIONAL_VARIABLES.join(", "));
    })?;
    config.log();

    let fetcher = build_fetcher(&config)?;
    let network = fetcher.fetch(&config.bbox, config.network_type)?;
    log::info!("network: {} nodes, {} edges", network.node_count(), network.edge_count());

    write_junctions(&network, &config.output)?;
    Ok(())
}

fn build_fetcher(config: &ExtractConfig) -> Result<Box<dyn GraphFetcher>> {
    let fetcher: Box<dyn GraphFetcher> = match &config.source {
        Source::Overpass { endpoint, timeout_secs } => {
            Box::new(OverpassFetcher::new(endpoint, *timeout_secs, config.options.clone())?)
        }
        Source::Cached(path) => Box::new(CachedResponseFetcher::new(path.clone(), config.options.clone())),
        Source::Pbf(path) => pbf_fetcher(path, config)?,
    };
    Ok(fetcher)
}

#[cfg(feature = "osm")]
fn pbf_fetcher(path: &std::path::Path, config: &ExtractConfig) -> Result<Box<dyn GraphFetcher>> {
    Ok(Box::new(jx_spatial::PbfFetcher::new(path, config.options.clone())))
}

#[cfg(not(feature = "osm"))]
fn pbf_fetcher(path: &std::path::Path, _config: &ExtractConfig) -> Result<Box<dyn GraphFetcher>> {
    anyhow::bail!("JX_OSM_PBF={} needs a build with the `osm` feature", path.display())
}

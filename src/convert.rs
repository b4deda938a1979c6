use crate::{
    csv_loops::{self, CsvOptions},
    dxf_loops, encoder,
    error::Error,
    loops::Loop,
    reproject::Reprojector,
    ring::{Ring, RingPolicy},
    time_track::{Stage, TimeStats},
};
use geojson::FeatureCollection;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Dxf,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("dxf") => Ok(Self::Dxf),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }

    // CSV exports are reversed to the right-hand rule, CAD polylines are
    // taken in drawing order.
    pub fn ring_policy(self) -> RingPolicy {
        match self {
            Self::Csv => RingPolicy::CloseAndReverse,
            Self::Dxf => RingPolicy::CloseIfOpen,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Overrides detection by file extension.
    pub format: Option<SourceFormat>,

    pub csv: CsvOptions,
}

/// Reads `source_file` and returns its loops as WGS84 polygons. Writes nothing.
pub fn convert(
    source_file: &Path,
    source_crs: &str,
    options: &ConvertOptions,
) -> Result<FeatureCollection, Error> {
    convert_tracked(source_file, source_crs, options, &mut TimeStats::default())
}

pub fn convert_tracked(
    source_file: &Path,
    source_crs: &str,
    options: &ConvertOptions,
    stats: &mut TimeStats,
) -> Result<FeatureCollection, Error> {
    let format = options
        .format
        .map_or_else(|| SourceFormat::from_path(source_file), Ok)?;

    let reprojector = Reprojector::to_wgs84(source_crs)?;

    debug!("Reading {} as {format:?}", source_file.display());

    let mut loops: Vec<Loop> = stats
        .track(Stage::Parse, || match format {
            SourceFormat::Csv => csv_loops::read_loops(source_file, &options.csv),
            SourceFormat::Dxf => dxf_loops::read_loops(source_file),
        })?
        .into_iter()
        .collect();

    info!("Found {} loops in {}", loops.len(), source_file.display());

    stats.track(Stage::Reproject, || {
        loops.iter_mut().try_for_each(|lp| reprojector.reproject(lp))
    })?;

    let policy = format.ring_policy();

    let rings = stats.track(Stage::Normalize, || {
        loops
            .into_iter()
            .map(|lp| Ring::new(lp, policy))
            .collect::<Result<Vec<_>, _>>()
    })?;

    Ok(stats.track(Stage::Encode, || encoder::feature_collection(rings)))
}

/// Like [`convert`], also writing the result to `<base name>.json` beside the
/// input. Returns the collection and the path written.
pub fn convert_file(
    source_file: &Path,
    source_crs: &str,
    options: &ConvertOptions,
    stats: &mut TimeStats,
) -> Result<(FeatureCollection, PathBuf), Error> {
    let collection = convert_tracked(source_file, source_crs, options, stats)?;

    let target_file = encoder::output_path(source_file);

    stats.track(Stage::Write, || {
        encoder::write_geojson(&collection, &target_file)
    })?;

    info!("GeoJSON file exported to {}", target_file.display());

    Ok((collection, target_file))
}

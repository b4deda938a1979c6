//! Survey loops (CSV point exports or DXF polylines) in a projected CRS to
//! WGS84 GeoJSON polygons.

pub mod convert;
pub mod csv_loops;
pub mod dxf_loops;
pub mod encoder;
pub mod error;
pub mod loops;
pub mod preview;
pub mod reproject;
pub mod ring;
pub mod time_track;

pub use convert::{ConvertOptions, SourceFormat, convert, convert_file, convert_tracked};
pub use error::{Error, MalformedInput, UnreadableFile};
pub use time_track::TimeStats;

use proj::{ProjCreateError, ProjError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid/unsupported CRS {crs:?}: {source}")]
    InvalidCrs {
        crs: String,
        #[source]
        source: ProjCreateError,
    },

    #[error("Reprojection of loop {loop_id:?} failed: {source}")]
    Reprojection {
        loop_id: String,
        #[source]
        source: ProjError,
    },

    #[error("Reprojection of loop {loop_id:?} produced a non-finite coordinate")]
    NonFiniteCoordinate { loop_id: String },

    #[error("Malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    #[error("Unreadable file: {0}")]
    UnreadableFile(#[from] UnreadableFile),

    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Error writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error serializing GeoJSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum MalformedInput {
    #[error("line {line}: vertex row before any \"# Object:\" marker")]
    VertexBeforeMarker { line: u64 },

    #[error("line {line}: {column} value {value:?} is not a number")]
    InvalidCoordinate {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: expected 6 columns, found {found}")]
    ColumnCount { line: u64, found: usize },

    #[error("layer {layer:?} has no \"%%\" loop id separator")]
    MissingLayerToken { layer: String },

    #[error("loop {loop_id:?} has no vertices")]
    EmptyLoop { loop_id: String },
}

#[derive(Error, Debug)]
pub enum UnreadableFile {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("not a DXF file or a generic I/O error: {0}")]
    NotADrawing(String),

    #[error("invalid or corrupted DXF file: {0}")]
    CorruptDrawing(String),
}

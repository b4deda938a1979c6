use crate::{
    error::{Error, MalformedInput, UnreadableFile},
    loops::{Loop, Loops},
};
use dxf::{
    Drawing, DxfError,
    entities::{Entity, EntityType},
};
use geo::{Coord, LineString};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tracing::debug;

/// Layer names carry the loop id after this token, e.g. `SURVEY%%LoopA`.
pub const LAYER_ID_SEPARATOR: &str = "%%";

const BINARY_SENTINEL: &[u8] = b"AutoCAD Binary DXF";

pub fn read_loops(path: &Path) -> Result<Loops, Error> {
    check_signature(path)?;

    let drawing = Drawing::load_file(path).map_err(|e| match e {
        DxfError::IoError(e) => UnreadableFile::NotADrawing(e.to_string()),
        e => UnreadableFile::CorruptDrawing(e.to_string()),
    })?;

    Ok(loops_from_drawing(&drawing)?)
}

/// Rejects files that do not start like a drawing: neither the binary
/// sentinel nor a `0`/`SECTION` pair (after any `999` comments).
fn check_signature(path: &Path) -> Result<(), UnreadableFile> {
    let io_error = |e: std::io::Error| UnreadableFile::NotADrawing(e.to_string());

    let mut reader = BufReader::new(File::open(path).map_err(io_error)?);

    if reader.fill_buf().map_err(io_error)?.starts_with(BINARY_SENTINEL) {
        return Ok(());
    }

    let mut lines = reader.lines();

    let mut next_tag = || -> Result<Option<String>, UnreadableFile> {
        Ok(lines
            .next()
            .transpose()
            .map_err(io_error)?
            .map(|line| line.trim_start_matches('\u{feff}').trim().to_string()))
    };

    loop {
        let code = next_tag()?;
        let value = next_tag()?;

        match (code.as_deref(), value.as_deref()) {
            (Some("999"), Some(_)) => continue,
            (Some("0"), Some("SECTION")) => return Ok(()),
            _ => {
                return Err(UnreadableFile::NotADrawing(
                    "file does not start with a DXF section".into(),
                ));
            }
        }
    }
}

pub fn loops_from_drawing(drawing: &Drawing) -> Result<Loops, MalformedInput> {
    let mut loops = Loops::default();

    for entity in drawing.entities() {
        if entity.common.is_in_paper_space {
            continue;
        }

        let Some(vertices) = polyline_vertices(entity) else {
            continue;
        };

        let id = loop_id(&entity.common.layer)?;

        debug!("Polyline {id:?} with {} vertices", vertices.0.len());

        loops.insert(Loop::new(id, vertices));
    }

    Ok(loops)
}

// Vertices in entity order; `None` for anything that is not a polyline.
fn polyline_vertices(entity: &Entity) -> Option<LineString<f64>> {
    let coords: Vec<Coord<f64>> = match &entity.specific {
        EntityType::Polyline(poly) => poly
            .vertices()
            .map(|v| Coord {
                x: v.location.x,
                y: v.location.y,
            })
            .collect(),
        EntityType::LwPolyline(lwpoly) => lwpoly
            .vertices
            .iter()
            .map(|v| Coord { x: v.x, y: v.y })
            .collect(),
        _ => return None,
    };

    Some(LineString::new(coords))
}

fn loop_id(layer: &str) -> Result<String, MalformedInput> {
    layer
        .split(LAYER_ID_SEPARATOR)
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| MalformedInput::MissingLayerToken {
            layer: layer.to_string(),
        })
}
